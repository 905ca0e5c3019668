fn main() -> anyhow::Result<()> {
    odata_swagger::cli::run_cli()
}
