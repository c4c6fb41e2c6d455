fn main() -> Result<(), anyhow::Error> {
    strong_scaling::run()
}
