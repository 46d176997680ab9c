//! Constants for the `gst` application.

use nu_ansi_term::Color;

/// Default name of the stack state file, relative to the repository root.
pub(crate) const DEFAULT_STORE_FILE_NAME: &str = ".gitstack";

/// Environment variable that overrides the stack state file name.
pub(crate) const STORE_FILE_ENV_VAR: &str = "GITSTACK_FILE";

/// Branch names probed, in order, when resolving the trunk branch.
pub(crate) const TRUNK_CANDIDATES: [&str; 2] = ["main", "master"];

/// Sentinel parent argument selecting the branch checked out at startup.
pub(crate) const CURRENT_BRANCH_SENTINEL: &str = ".";

pub(crate) const COLORS: [Color; 6] = [
    Color::Blue,
    Color::Cyan,
    Color::Green,
    Color::Red,
    Color::Yellow,
    Color::Purple,
];

pub(crate) const FILLED_CIRCLE: char = '●';
pub(crate) const EMPTY_CIRCLE: char = '○';
pub(crate) const BOTTOM_LEFT_BOX: char = '└';
pub(crate) const LEFT_FORK_BOX: char = '├';
pub(crate) const VERTICAL_BOX: char = '│';
pub(crate) const HORIZONTAL_BOX: char = '─';
