use std::path::{Path, PathBuf};

/// Lower-case, spaces to underscores, apostrophes dropped.
pub fn sanitize_filename(name: &str) -> String {
    name.to_lowercase().replace(' ', "_").replace('\'', "")
}

pub fn gif_url(game: &str, pokemon: &str, shiny: bool) -> String {
    let folder = if shiny { "shiny_gifs" } else { "gifs" };
    format!("/static/{folder}/{game}/{}.gif", sanitize_filename(pokemon))
}

pub fn shiny_gifs_exist(static_dir: &Path, game: &str) -> bool {
    static_dir.join("shiny_gifs").join(game).is_dir()
}

/// Location on disk of the regular GIF for `pokemon`, if there is one.
pub fn gif_file(static_dir: &Path, game: &str, pokemon: &str) -> Option<PathBuf> {
    let path = static_dir
        .join("gifs")
        .join(game)
        .join(format!("{}.gif", sanitize_filename(pokemon)));
    path.is_file().then_some(path)
}
