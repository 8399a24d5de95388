fn main() -> anyhow::Result<()> {
    wordmatch_cli_lib::run()
}
