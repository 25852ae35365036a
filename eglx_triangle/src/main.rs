fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    eglx_triangle::main(eglx_triangle::config::DemoConfig::default())
}
