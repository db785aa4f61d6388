pub type CmdResult<T> = konfluxctl::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod arch_table;
pub mod bump;
pub mod new_branch;
pub mod renovate;
pub mod version;

pub(crate) fn run_raw(
    command: crate::Commands,
    _global: &GlobalArgs,
) -> konfluxctl::Result<(String, i32)> {
    match command {
        crate::Commands::ArchTable(args) => arch_table::run_raw(args),
        _ => Err(konfluxctl::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support raw output",
            None,
        )),
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (konfluxctl::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Version(args) => dispatch!(args, global, version),
        crate::Commands::Bump(args) => dispatch!(args, global, bump),
        crate::Commands::NewBranch(args) => dispatch!(args, global, new_branch),
        crate::Commands::Renovate(args) => dispatch!(args, global, renovate),

        // Special case: ArchTable uses raw output mode
        crate::Commands::ArchTable(_) => {
            let err = konfluxctl::Error::validation_invalid_argument(
                "output_mode",
                "arch-table uses raw output mode",
                None,
            );
            crate::output::map_cmd_result_to_json::<serde_json::Value>(Err(err))
        }
    }
}
