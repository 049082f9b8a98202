pub mod candidate;
pub mod certification;
pub mod profile;
pub mod report;
pub mod skill;

pub use candidate::*;
pub use certification::*;
pub use profile::*;
pub use report::*;
pub use skill::*;
