//! CLI flags shared across subcommands.

mod globals;
pub use globals::GlobalArgs;

mod relay;
pub use relay::RelayArgs;
