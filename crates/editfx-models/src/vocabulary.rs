//! Closed vocabularies for categorical annotation fields.
//!
//! Every vocabulary entry has a NAME (the short upper-case key operators type
//! at prompts) and a VALUE (the human-readable label the annotation service
//! emits). Parsing accepts either form; serialization always emits the VALUE.

use std::fmt;

/// A fixed enumeration with explicit name/value mapping.
pub trait Vocabulary: Sized + Copy + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// Short NAME used at prompts (e.g. `SINGLEANGLE`).
    fn name(self) -> &'static str;

    /// Serialized VALUE (e.g. `Single Static Angle`).
    fn value(self) -> &'static str;

    /// Parse by NAME or VALUE. Exact matches win over case-insensitive ones.
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name() == raw || v.value() == raw)
            .or_else(|| {
                Self::ALL.iter().copied().find(|v| {
                    v.name().eq_ignore_ascii_case(raw) || v.value().eq_ignore_ascii_case(raw)
                })
            })
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        pub enum $ty:ident {
            $($variant:ident = ($name:literal, $value:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $ty {
            $($variant),+
        }

        impl Vocabulary for $ty {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }

            fn value(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.value())
            }
        }

        impl ::serde::Serialize for $ty {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.value())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                <Self as Vocabulary>::parse(&raw).ok_or_else(|| {
                    <D::Error as ::serde::de::Error>::custom(format!(
                        "unknown {} '{}', expected one of: {}",
                        stringify!($ty),
                        raw,
                        [$($value),+].join(", ")
                    ))
                })
            }
        }

        impl ::schemars::JsonSchema for $ty {
            fn schema_name() -> String {
                stringify!($ty).to_string()
            }

            fn json_schema(_gen: &mut ::schemars::gen::SchemaGenerator) -> ::schemars::schema::Schema {
                ::schemars::schema::SchemaObject {
                    instance_type: Some(::schemars::schema::InstanceType::String.into()),
                    enum_values: Some(vec![$(::serde_json::Value::from($value)),+]),
                    ..Default::default()
                }
                .into()
            }
        }
    };
}

vocabulary! {
    /// How the video is shot.
    pub enum CameraAngle {
        SingleStaticAngle = ("SINGLEANGLE", "Single Static Angle"),
        MultipleStaticAngle = ("MULTIPLEANGLE", "Multiple Static Angle"),
        DynamicCameraMovement = ("DYNAMIC", "Dynamic Camera Movement"),
    }
}

vocabulary! {
    /// Overall format of the video.
    pub enum OverallType {
        Montage = ("MONTAGE", "Montage"),
        MovieClip = ("MOVIECLIP", "Movie"),
        Pov = ("POV", "POV"),
        TalkingHead = ("TALKINGHEAD", "Talking Head"),
        Vlog = ("VLOG", "Vlog"),
        TextOverlay = ("TEXTOVERLAY", "Text Overlay"),
        Interview = ("INTERVIEW", "Interview"),
        Animated = ("ANIMATED", "Animated"),
        HowTo = ("HOWTO", "How-to"),
        TrendingAudio = ("TRENDINGAUDIO", "Trending Audio"),
    }
}

vocabulary! {
    /// Kind of on-screen text.
    pub enum TextType {
        CallToAction = ("CTA", "Call to Action"),
        Transcript = ("TRANSCRIPT", "Transcript"),
        Hook = ("HOOK", "Hook"),
        SpecificKeywords = ("SPECIFICKEYWORDS", "Specific Keywords"),
    }
}

vocabulary! {
    /// Transition style between clips.
    pub enum TransitionType {
        Fade = ("FADE_TRANSITION", "Fade Transition"),
        Slide = ("SLIDE_TRANSITION", "Slide Transition"),
        Wipe = ("WIPE_TRANSITION", "Wipe Transition"),
        Flip = ("FLIP_TRANSITION", "Flip Transition"),
        Clockwipe = ("CLOCKWIPE_TRANSITION", "Clockwipe Transition"),
        Iris = ("IRIS_TRANSITION", "Iris Transition"),
        Zoom = ("ZOOM_TRANSITION", "Zoom Transition"),
    }
}

vocabulary! {
    /// Content category of the video.
    pub enum Category {
        SingingAndDancing = ("SINGING", "Singing & Dancing"),
        Comedy = ("COMEDY", "Comedy"),
        Sports = ("SPORTS", "Sports"),
        AnimeAndComics = ("ANIMEANDCOMICS", "Anime & Comics"),
        Relationship = ("RELATIONSHIP", "Relationship"),
        Shows = ("SHOWS", "Shows"),
        Lipsync = ("LIPSYNC", "Lipsync"),
        DailyLife = ("DAILYLIFE", "Daily Life"),
        BeautyCare = ("BEAUTYCARE", "Beauty Care"),
        Games = ("GAMES", "Games"),
        Society = ("SOCIETY", "Society"),
        Outfit = ("OUTFIT", "Outfit"),
        Cars = ("CARS", "Cars"),
        Food = ("FOOD", "Food"),
        Animals = ("ANIMALS", "Animals"),
        Family = ("FAMILY", "Family"),
        Drama = ("DRAMA", "Drama"),
        FitnessAndHealth = ("FITNESSANDHEALTH", "Fitness & Health"),
        Education = ("EDUCATION", "Education"),
        Technology = ("TECHNOLOGY", "Technology"),
    }
}

vocabulary! {
    /// Playback speed relative to real time.
    pub enum PlaybackSpeed {
        Increased = ("INCREASED", "Increased"),
        Normal = ("NORMAL", "Normal"),
        Slowed = ("SLOWED", "Slowed"),
    }
}

vocabulary! {
    /// Medium of a b-roll insert.
    pub enum BrollType {
        Video = ("VIDEO", "video"),
        Image = ("IMAGE", "image"),
    }
}

vocabulary! {
    /// Kind of animated graphic.
    pub enum AnimatedGraphicsType {
        Gif = ("GIF", "GIF"),
        Sticker = ("STICKER", "STICKER"),
        Clip = ("CLIP", "CLIP"),
        Meme = ("MEME", "MEME"),
        Emoji = ("EMOJI", "EMOJI"),
    }
}

/// Runtime handle on one of the vocabularies, for schema-driven code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VocabularyKind {
    CameraAngle,
    OverallType,
    TextType,
    Transition,
    Category,
    PlaybackSpeed,
    BrollType,
    AnimatedGraphicsType,
}

fn entries_of<V: Vocabulary>() -> Vec<(&'static str, &'static str)> {
    V::ALL.iter().map(|v| (v.name(), v.value())).collect()
}

fn canonical_of<V: Vocabulary>(raw: &str) -> Option<&'static str> {
    V::parse(raw).map(Vocabulary::value)
}

impl VocabularyKind {
    /// `(NAME, VALUE)` pairs in declaration order.
    pub fn entries(self) -> Vec<(&'static str, &'static str)> {
        match self {
            Self::CameraAngle => entries_of::<CameraAngle>(),
            Self::OverallType => entries_of::<OverallType>(),
            Self::TextType => entries_of::<TextType>(),
            Self::Transition => entries_of::<TransitionType>(),
            Self::Category => entries_of::<Category>(),
            Self::PlaybackSpeed => entries_of::<PlaybackSpeed>(),
            Self::BrollType => entries_of::<BrollType>(),
            Self::AnimatedGraphicsType => entries_of::<AnimatedGraphicsType>(),
        }
    }

    /// Resolve a NAME or VALUE to the canonical VALUE.
    pub fn canonical(self, raw: &str) -> Option<&'static str> {
        match self {
            Self::CameraAngle => canonical_of::<CameraAngle>(raw),
            Self::OverallType => canonical_of::<OverallType>(raw),
            Self::TextType => canonical_of::<TextType>(raw),
            Self::Transition => canonical_of::<TransitionType>(raw),
            Self::Category => canonical_of::<Category>(raw),
            Self::PlaybackSpeed => canonical_of::<PlaybackSpeed>(raw),
            Self::BrollType => canonical_of::<BrollType>(raw),
            Self::AnimatedGraphicsType => canonical_of::<AnimatedGraphicsType>(raw),
        }
    }

    /// Comma-joined NAMEs, for prompt hints.
    pub fn names(self) -> String {
        self.entries()
            .into_iter()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
