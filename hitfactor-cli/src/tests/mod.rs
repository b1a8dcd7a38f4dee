//! Shared test harness modules for the hitfactor CLI.

use super::*;

mod helpers;
mod layers;
mod pipeline;
mod pipeline_steps;
