//! Shared test harness modules for the metromap CLI.

use super::*;

mod helpers;
mod pipeline;
