//! CLI module for queuecalc.
//!
//! All CLI logic lives here so it can be tested; `main.rs` only installs
//! the log subscriber and calls [`run_cli`].

mod args;
mod commands;
mod output;

pub use args::{Args, Command};
pub use commands::{compare_scenarios, compute_model, run_cli, run_scenarios, show_formula};
pub use output::{
    print_help, print_version, render_comparison_table, render_json, render_model_list,
    render_result, APPROXIMATE_PN_NOTE,
};
