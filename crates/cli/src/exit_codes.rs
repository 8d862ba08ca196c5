//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of the
//! shell contract — scripts gate game-night pipelines on them.
//!
//! | Code | Meaning                                           |
//! |------|---------------------------------------------------|
//! | 0    | Success, sources agree                            |
//! | 1    | General error (unspecified; avoid)                |
//! | 2    | CLI usage error (bad args)                        |
//! | 3    | Run completed, discrepancies found                |
//! | 4    | Config invalid (parse or validation failure)      |
//! | 5    | Runtime error (unreadable config, write failure)  |

/// Success - run completed and the sources agree.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// The run completed but reported discrepancies between sources.
/// Like `diff(1)`, a nonzero exit here means "inputs differ", not "broken".
pub const EXIT_DISCREPANCIES: u8 = 3;

/// Config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Runtime error - unreadable config file, output write failure.
pub const EXIT_RUNTIME: u8 = 5;
