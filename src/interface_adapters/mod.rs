// Interface adapters: wire protocol and UDP handling.

pub mod net;
pub mod protocol;
