pub mod describe;
pub mod drift;
pub mod events;
pub mod list;
pub mod outputs;
pub mod resources;
pub mod tail;
pub mod template;
pub mod validate;

use std::fmt;

/// A command found nothing to show and has already told the user.
///
/// `main` exits non-zero without printing anything further.
#[derive(Debug)]
pub struct NothingFound;

impl fmt::Display for NothingFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("nothing found")
    }
}

impl std::error::Error for NothingFound {}
