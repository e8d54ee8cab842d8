use crate::enums::Popularity;

/// Score above which an attraction is promoted to HIGH popularity.
pub const POPULARITY_LIMIT: i32 = 10;

/// Advance the popularity state machine by one successful update.
///
/// The score grows by exactly one per call and the tier flips LOW -> HIGH
/// once the new score exceeds [`POPULARITY_LIMIT`]. The tier never reverts:
/// an already-HIGH attraction stays HIGH no matter the score passed in.
pub fn advance(score: i32, tier: Popularity) -> (i32, Popularity) {
    let next_score = score + 1;
    let next_tier = if next_score > POPULARITY_LIMIT {
        Popularity::High
    } else {
        tier
    };
    (next_score, next_tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleven_updates_flip_high_exactly_once() {
        let mut score = 0;
        let mut tier = Popularity::Low;
        let mut flips = 0;

        for n in 1..=11 {
            let was = tier;
            (score, tier) = advance(score, tier);
            assert_eq!(score, n);
            if was != tier {
                flips += 1;
                assert_eq!(n, 11, "tier must flip on the 11th update");
            }
        }

        assert_eq!(flips, 1);
        assert_eq!(tier, Popularity::High);
    }

    #[test]
    fn tier_stays_low_at_the_limit() {
        let (score, tier) = advance(POPULARITY_LIMIT - 1, Popularity::Low);
        assert_eq!(score, POPULARITY_LIMIT);
        assert_eq!(tier, Popularity::Low);
    }

    #[test]
    fn high_never_reverts() {
        let (_, tier) = advance(0, Popularity::High);
        assert_eq!(tier, Popularity::High);
    }
}
