fn main() {
    climate_pipeline::cli::run();
}
