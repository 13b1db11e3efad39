use rand::Rng;

use crate::assets;

/// The chance of drawing a shiny GIF, as "one in `one_in`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShinyOdds {
    one_in: u32,
    enabled: bool,
}

impl ShinyOdds {
    /// Without shiny GIFs on disk there is nothing to draw, so every roll
    /// misses.
    pub fn new(one_in: u32, shiny_gifs_exist: bool) -> Self {
        Self {
            one_in: one_in.max(1),
            enabled: shiny_gifs_exist,
        }
    }

    pub fn one_in(&self) -> u32 {
        self.one_in
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.enabled && rng.gen_range(0..self.one_in) == 0
    }
}

/// Fires once per page session, on the first shiny render.
#[derive(Debug, Clone, Default)]
pub struct ShinyGate {
    fired: bool,
}

impl ShinyGate {
    /// True only for the first rare render this gate sees.
    pub fn observe(&mut self, rare: bool) -> bool {
        if rare && !self.fired {
            self.fired = true;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifChoice {
    pub url: String,
    pub shiny: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShinyReveal {
    pub pokemon: String,
}

/// One rendering pass: draws a GIF per row and remembers whether the gate
/// fired during the pass.
pub struct ShinyDraw<'a, R: Rng + ?Sized> {
    odds: ShinyOdds,
    game: &'a str,
    gate: &'a mut ShinyGate,
    rng: &'a mut R,
    reveal: Option<ShinyReveal>,
}

impl<'a, R: Rng + ?Sized> ShinyDraw<'a, R> {
    pub fn new(odds: ShinyOdds, game: &'a str, gate: &'a mut ShinyGate, rng: &'a mut R) -> Self {
        Self {
            odds,
            game,
            gate,
            rng,
            reveal: None,
        }
    }

    pub fn gif(&mut self, pokemon: &str) -> GifChoice {
        let shiny = self.odds.roll(&mut *self.rng);
        if self.gate.observe(shiny) {
            tracing::info!(pokemon, "Shiny drawn");
            self.reveal = Some(ShinyReveal {
                pokemon: pokemon.to_string(),
            });
        }

        GifChoice {
            url: assets::gif_url(self.game, pokemon, shiny),
            shiny,
        }
    }

    pub fn finish(self) -> Option<ShinyReveal> {
        self.reveal
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn odds_of_one_always_hit() {
        let odds = ShinyOdds::new(1, true);
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..100).all(|_| odds.roll(&mut rng)));
    }

    #[test]
    fn zero_odds_are_treated_as_one() {
        let odds = ShinyOdds::new(0, true);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(odds.roll(&mut rng));
    }

    #[test]
    fn missing_shiny_folder_never_hits() {
        let odds = ShinyOdds::new(1, false);
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..100).all(|_| !odds.roll(&mut rng)));
    }

    #[test]
    fn gate_fires_once() {
        let mut gate = ShinyGate::default();
        assert!(!gate.observe(false));
        assert!(gate.observe(true));
        assert!(!gate.observe(true));
        assert!(!gate.observe(false));
    }

    #[test]
    fn draw_reports_only_the_first_reveal() {
        let mut gate = ShinyGate::default();
        let mut rng = StdRng::seed_from_u64(1);

        let mut draw = ShinyDraw::new(ShinyOdds::new(1, true), "crystal", &mut gate, &mut rng);
        let first = draw.gif("Gengar");
        let second = draw.gif("Pikachu");
        assert!(first.shiny && second.shiny);
        assert_eq!(second.url, "/static/shiny_gifs/crystal/pikachu.gif");
        assert_eq!(
            draw.finish(),
            Some(ShinyReveal {
                pokemon: "Gengar".into()
            })
        );

        let mut draw = ShinyDraw::new(ShinyOdds::new(1, true), "crystal", &mut gate, &mut rng);
        draw.gif("Gengar");
        assert_eq!(draw.finish(), None);
    }

    #[test]
    fn never_fires_when_the_draw_misses() {
        let mut gate = ShinyGate::default();
        let mut rng = StdRng::seed_from_u64(1);

        let mut draw = ShinyDraw::new(ShinyOdds::new(1, false), "crystal", &mut gate, &mut rng);
        for _ in 0..50 {
            let gif = draw.gif("Magikarp");
            assert_eq!(gif.url, "/static/gifs/crystal/magikarp.gif");
        }
        assert_eq!(draw.finish(), None);

        // still armed for a later hit
        assert!(gate.observe(true));
    }
}
