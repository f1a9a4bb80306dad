use clap::Parser;
use nowaste::cli::{init_logging, StubArgs};
use nowaste::http::HttpServer;
use nowaste::stub::stub_router;

fn main() {
    let args = StubArgs::parse();
    init_logging(args.verbose.max(1));

    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &StubArgs) -> nowaste::errors::Result<()> {
    let server = HttpServer::new(&args.address)?;
    let router = stub_router(&args.prefix)?;
    tracing::info!(address = %server.local_addr()?, prefix = %args.prefix, "stub API listening");

    server.serve(move |request| router.handle(&request));
    Ok(())
}
