// Build script for siak-service
// Compiles siak_service.proto for gRPC server and client code generation
fn main() {
    println!("cargo:rerun-if-changed=../proto/services/siak_service.proto");

    let protoc = protoc_bin_vendored::protoc_bin_path().expect("Failed to find vendored protoc");
    std::env::set_var("PROTOC", protoc);

    // siak-service PROVIDES MhsBiodataApiService (server implementation)
    // Client code is also generated for integration tests
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &["../proto/services/siak_service.proto"],
            &["../proto/services"],
        )
        .expect("Failed to compile siak_service.proto for siak-service");
}
