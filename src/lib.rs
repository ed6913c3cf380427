// Library root
// -----------
// The binary (`main.rs`) wires these modules to stdin/stdout.
//
// Module responsibilities:
// - `input`: validated prompts over any reader/writer pair.
// - `list`: the in-memory list plus its unsaved-changes flag and filename.
// - `store`: reading and writing `<name>.txt` list files.
// - `ui`: the menu loop and the list operations behind each command.
// - `config` / `logging`: environment settings and diagnostics.
pub mod config;
pub mod input;
pub mod list;
pub mod logging;
pub mod store;
pub mod ui;
