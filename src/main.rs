fn main() -> std::process::ExitCode {
    astra_phoenix_lib::run()
}
