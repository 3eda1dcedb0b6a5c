//! Assemble lines from OpenStreetMap route relations.
//!
//! A line is published upstream as a route master whose members are route
//! relations, one per direction or branch. Each route relation lists stop
//! nodes and track ways by role. [`LineAssembler`] folds the route relations
//! of one master into a [`Line`].

use log::warn;

use crate::model::{Line, NodeId, Tags, WayId};

/// Kind of object a relation member points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MemberKind {
    /// A node member.
    Node,
    /// A way member.
    Way,
    /// A nested relation.
    Relation,
}

/// One member of a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationMember {
    /// Kind of the referenced object.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: MemberKind,
    /// Identifier of the referenced object.
    #[cfg_attr(feature = "serde", serde(rename = "ref"))]
    pub ref_id: u64,
    /// Member role; empty for plain track.
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: String,
}

impl RelationMember {
    /// Construct a member.
    #[must_use]
    pub fn new(kind: MemberKind, ref_id: u64, role: impl Into<String>) -> Self {
        Self {
            kind,
            ref_id,
            role: role.into(),
        }
    }

    /// How a route relation uses this member.
    #[must_use]
    pub fn usage(&self) -> MemberUse {
        match (self.kind, self.role.as_str()) {
            (MemberKind::Node, "stop" | "stop_entry_only" | "stop_exit_only") => {
                MemberUse::Stop(self.ref_id)
            }
            (MemberKind::Way, "" | "forward" | "backward") => MemberUse::Track(self.ref_id),
            (
                MemberKind::Way,
                "platform" | "platform_entry_only" | "platform_exit_only" | "access",
            ) => MemberUse::Ignored,
            _ => MemberUse::Unexpected,
        }
    }
}

/// Classification of a route relation member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberUse {
    /// A stop node.
    Stop(NodeId),
    /// A way carrying track; `forward`/`backward` are legacy split roles.
    Track(WayId),
    /// A recognised member with no geometry role (platforms, access ways).
    Ignored,
    /// Any other member.
    Unexpected,
}

/// A route or route-master relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteRelation {
    /// Relation identifier.
    pub id: u64,
    /// Relation tags such as `name`, `ref` and `colour`.
    #[cfg_attr(feature = "serde", serde(default, rename = "tag"))]
    pub tags: Tags,
    /// Members in upstream order.
    #[cfg_attr(feature = "serde", serde(default, rename = "member"))]
    pub members: Vec<RelationMember>,
}

impl RouteRelation {
    /// Identifiers of member relations, in order.
    pub fn member_relations(&self) -> impl Iterator<Item = u64> + '_ {
        self.members
            .iter()
            .filter(|member| member.kind == MemberKind::Relation)
            .map(|member| member.ref_id)
    }
}

/// Folds the route relations of one route master into a [`Line`].
///
/// # Examples
/// ```
/// use metromap_core::{LineAssembler, MemberKind, RelationMember, RouteRelation};
///
/// let mut master = RouteRelation::default();
/// master.tags.insert("name".into(), "Métro 4".into());
/// master.tags.insert("ref".into(), "4".into());
/// let mut assembler = LineAssembler::new(&master);
///
/// let mut route = RouteRelation::default();
/// route.members = vec![
///     RelationMember::new(MemberKind::Node, 7, "stop"),
///     RelationMember::new(MemberKind::Way, 70, ""),
///     RelationMember::new(MemberKind::Way, 71, "platform"),
/// ];
/// assembler.add_route(&route);
/// let line = assembler.finish();
/// assert_eq!(line.reference, "4");
/// assert_eq!(line.stops, vec![7]);
/// assert_eq!(line.ways.get(&70), Some(&1));
/// ```
#[derive(Debug, Clone)]
pub struct LineAssembler {
    line: Line,
}

impl LineAssembler {
    /// Seed a line from route-master tags.
    #[must_use]
    pub fn new(master: &RouteRelation) -> Self {
        let tag = |key: &str| master.tags.get(key).cloned().unwrap_or_default();
        let mut line = Line::new(tag("name"), tag("ref"));
        line.color = master.tags.get("colour").cloned();
        Self { line }
    }

    /// Add the stops and track of one route relation.
    pub fn add_route(&mut self, route: &RouteRelation) {
        if let Some(colour) = route.tags.get("colour") {
            match &self.line.color {
                Some(existing) if existing != colour => warn!(
                    "relation {} has colour {colour} but line {} is {existing}; keeping {existing}",
                    route.id, self.line.name
                ),
                Some(_) => {}
                None => self.line.color = Some(colour.clone()),
            }
        }
        for member in &route.members {
            match member.usage() {
                MemberUse::Stop(node) => self.line.add_stop(node),
                MemberUse::Track(way) => self.line.add_way(way),
                MemberUse::Ignored => {}
                MemberUse::Unexpected => warn!(
                    "relation {} has unexpected member type {:?} role {:?} ref {}",
                    route.id, member.kind, member.role, member.ref_id
                ),
            }
        }
    }

    /// The assembled line.
    #[must_use]
    pub fn finish(self) -> Line {
        self.line
    }
}
