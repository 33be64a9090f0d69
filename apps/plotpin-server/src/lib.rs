//! Library surface of the server binary: wiring is exposed so integration
//! tests can drive the assembled router without binding a socket.

pub mod bootstrap;
