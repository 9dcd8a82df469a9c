fn main() -> anyhow::Result<()> {
    code_detective_lib::run()
}
