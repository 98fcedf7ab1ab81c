pub mod preview;
pub mod public;
pub mod publish;
pub mod sites;
pub mod versions;
