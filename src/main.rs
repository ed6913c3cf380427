// Entrypoint for the list maker.
// - Keeps `main` small: set up logging, read the data directory from the
//   environment and hand stdin/stdout to the menu loop.

use list_maker::{config::Config, logging, ui::main_menu};

fn main() -> anyhow::Result<()> {
    logging::init();

    // `LIST_MAKER_DIR` picks where list files live; defaults to the
    // current directory. See `config::Config::from_env`.
    let config = Config::from_env();

    // Blocks until the user quits or stdin closes.
    main_menu(&config)?;
    Ok(())
}
