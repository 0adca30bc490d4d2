/// Standard Unix exit codes for the wardrobe CLI.
///
/// These codes follow the BSD convention (sysexits.h).
///
/// Successful termination
pub const SUCCESS: i32 = 0;

/// Command line usage error - invalid arguments, unknown facets, etc.
pub const USAGE: i32 = 64;

/// Input data rejected - missing image, tag outside the vocabulary
pub const DATAERR: i32 = 65;

/// Referenced entity does not exist
pub const NOINPUT: i32 = 66;

/// Durable storage could not be read or written
pub const IOERR: i32 = 74;
