//! Build script for bridge-bench.
//!
//! Compiles the bridge protocol definitions into client-side stubs.

fn main() {
    tonic_build::configure()
        .build_server(false)
        .build_client(true)
        .protoc_arg("--experimental_allow_proto3_optional")
        .compile_protos(&["proto/agent.proto"], &["proto"])
        .expect("Failed to compile protobuf definitions");
}
