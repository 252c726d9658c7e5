use super::types::EducationTrack;

pub const SCHOOL_AGE_MIN: u32 = 3;
pub const SCHOOL_AGE_MAX: u32 = 21;

#[derive(Copy, Clone, Debug)]
struct AgeBand {
    from: u32,
    to: u32,
    annual: f64,
}

const fn band(from: u32, to: u32, annual: f64) -> AgeBand {
    AgeBand { from, to, annual }
}

// Preschool, primary, lower secondary, upper secondary, university.
const ALL_PUBLIC: [AgeBand; 5] = [
    band(3, 5, 20.0),
    band(6, 11, 35.0),
    band(12, 14, 50.0),
    band(15, 17, 50.0),
    band(18, 21, 60.0),
];

const HIGH_PRIVATE: [AgeBand; 5] = [
    band(3, 5, 20.0),
    band(6, 11, 35.0),
    band(12, 14, 50.0),
    band(15, 17, 80.0),
    band(18, 21, 120.0),
];

const MIDDLE_PRIVATE: [AgeBand; 5] = [
    band(3, 5, 20.0),
    band(6, 11, 35.0),
    band(12, 14, 120.0),
    band(15, 17, 100.0),
    band(18, 21, 150.0),
];

fn bands(track: EducationTrack) -> &'static [AgeBand] {
    match track {
        EducationTrack::AllPublic => &ALL_PUBLIC,
        EducationTrack::HighPrivate => &HIGH_PRIVATE,
        EducationTrack::MiddlePrivate => &MIDDLE_PRIVATE,
        EducationTrack::Custom => &[],
    }
}

/// Nominal schooling cost for one dependent in the year they are `dependent_age`.
pub fn annual_cost(track: EducationTrack, dependent_age: u32, manual_amount: f64) -> f64 {
    if !(SCHOOL_AGE_MIN..=SCHOOL_AGE_MAX).contains(&dependent_age) {
        return 0.0;
    }
    if track == EducationTrack::Custom {
        return manual_amount;
    }
    bands(track)
        .iter()
        .find(|b| (b.from..=b.to).contains(&dependent_age))
        .map(|b| b.annual)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILT_IN: [EducationTrack; 3] = [
        EducationTrack::AllPublic,
        EducationTrack::HighPrivate,
        EducationTrack::MiddlePrivate,
    ];

    #[test]
    fn bands_tile_the_school_window_without_overlap() {
        for track in BUILT_IN {
            for age in SCHOOL_AGE_MIN..=SCHOOL_AGE_MAX {
                let hits = bands(track)
                    .iter()
                    .filter(|b| (b.from..=b.to).contains(&age))
                    .count();
                assert_eq!(hits, 1, "{track:?} age {age}");
            }
        }
    }

    #[test]
    fn outside_window_is_free() {
        for track in BUILT_IN {
            assert_eq!(annual_cost(track, 2, 0.0), 0.0);
            assert_eq!(annual_cost(track, 22, 0.0), 0.0);
        }
        assert_eq!(annual_cost(EducationTrack::Custom, 0, 99.0), 0.0);
        assert_eq!(annual_cost(EducationTrack::Custom, 30, 99.0), 0.0);
    }

    #[test]
    fn lookups_by_track() {
        assert_eq!(annual_cost(EducationTrack::AllPublic, 7, 0.0), 35.0);
        assert_eq!(annual_cost(EducationTrack::AllPublic, 19, 0.0), 60.0);
        assert_eq!(annual_cost(EducationTrack::HighPrivate, 16, 0.0), 80.0);
        assert_eq!(annual_cost(EducationTrack::HighPrivate, 21, 0.0), 120.0);
        assert_eq!(annual_cost(EducationTrack::MiddlePrivate, 13, 0.0), 120.0);
        assert_eq!(annual_cost(EducationTrack::MiddlePrivate, 18, 0.0), 150.0);
    }

    #[test]
    fn custom_track_uses_manual_amount() {
        assert_eq!(annual_cost(EducationTrack::Custom, 10, 42.5), 42.5);
        assert_eq!(annual_cost(EducationTrack::Custom, 3, 0.0), 0.0);
    }
}
