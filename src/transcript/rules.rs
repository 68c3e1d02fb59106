use super::CaptionTrack;

/// One step of the track fallback chain.
pub trait TrackRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn pick<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack>;
}

// Manually created tracks win over generated ones for the same language.
fn find_language<'a>(tracks: &'a [CaptionTrack], code: &str) -> Option<&'a CaptionTrack> {
    let mut matching = tracks.iter().filter(|t| t.language_code == code);
    let first = matching.clone().next()?;
    Some(matching.find(|t| !t.is_generated).unwrap_or(first))
}

pub struct PreferredLanguages(pub Vec<String>);

impl TrackRule for PreferredLanguages {
    fn name(&self) -> &'static str {
        "preferred_language"
    }

    fn pick<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        self.0.iter().find_map(|code| find_language(tracks, code))
    }
}

pub struct EnglishTrack;

impl TrackRule for EnglishTrack {
    fn name(&self) -> &'static str {
        "english"
    }

    fn pick<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        find_language(tracks, "en")
    }
}

pub struct AnyManualTrack;

impl TrackRule for AnyManualTrack {
    fn name(&self) -> &'static str {
        "any_manual"
    }

    fn pick<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        tracks.iter().find(|t| !t.is_generated)
    }
}

/// Ordered rule list; the first rule that yields a track wins.
pub struct TrackSelector {
    rules: Vec<Box<dyn TrackRule>>,
}

impl TrackSelector {
    pub fn new(rules: Vec<Box<dyn TrackRule>>) -> Self {
        Self { rules }
    }

    /// preferred languages → English → any manually created track
    pub fn standard(preferred_languages: &[String]) -> Self {
        Self::new(vec![
            Box::new(PreferredLanguages(preferred_languages.to_vec())),
            Box::new(EnglishTrack),
            Box::new(AnyManualTrack),
        ])
    }

    pub fn select<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<(&'static str, &'a CaptionTrack)> {
        self.rules
            .iter()
            .find_map(|rule| rule.pick(tracks).map(|t| (rule.name(), t)))
    }
}
