//! Generated bridge protocol types.
//!
//! The `agent` module is produced by `tonic-build` from `proto/agent.proto`.

pub mod agent {
    tonic::include_proto!("agent");
}
