use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    termdesk::cli::main()
}
