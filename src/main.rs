use blotto_cli::cli;

fn main() {
    cli::run();
}
