//! # Persona Registry
//!
//! The fixed cast of characters a user can talk to. Persona records are
//! static data: defined once, never mutated, shared by every view.
//!
//! Per-persona scripting (welcome line, canned replies) lives in a separate
//! table keyed by id, so adding a persona is a data change in two tables and
//! nothing else.

/// An immutable persona record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub description: &'static str,
    /// Theme color token (e.g. `"dialog-blue"`), mapped to a terminal color by the TUI.
    pub color: &'static str,
    pub emoji: &'static str,
    /// Optional avatar glyph shown instead of the emoji.
    pub avatar: Option<&'static str>,
}

impl Persona {
    /// The glyph used to represent this persona: its avatar, or the emoji when it has none.
    pub fn glyph(&self) -> &'static str {
        self.avatar.unwrap_or(self.emoji)
    }
}

static PERSONAS: &[Persona] = &[
    Persona {
        id: "captain",
        name: "Captain Grumblebeard",
        role: "Grumpy Pirate",
        description: "A salty old sea dog with a flair for the dramatic and a disdain for landlubbers.",
        color: "dialog-blue",
        emoji: "🏴‍☠️",
        avatar: None,
    },
    Persona {
        id: "zen",
        name: "Master Serenity",
        role: "Zen Monk",
        description: "Find your center with this peaceful guide who speaks in koans and gentle wisdom.",
        color: "dialog-green",
        emoji: "🧘",
        avatar: None,
    },
    Persona {
        id: "dev",
        name: "Caffeine Coder",
        role: "Energetic Developer",
        description: "A hyperactive programmer who solves problems fast and talks even faster.",
        color: "primary",
        emoji: "👩‍💻",
        avatar: None,
    },
    Persona {
        id: "chef",
        name: "Chef Gusteau",
        role: "Culinary Expert",
        description: "A passionate chef who believes anyone can cook with the right guidance.",
        color: "dialog-red",
        emoji: "👨‍🍳",
        avatar: None,
    },
    Persona {
        id: "professor",
        name: "Professor Knowitall",
        role: "Academic Expert",
        description: "A scholarly type who provides detailed, citation-heavy explanations.",
        color: "dialog-orange",
        emoji: "🧠",
        avatar: None,
    },
    Persona {
        id: "poet",
        name: "Lyra Versecraft",
        role: "Poetic Soul",
        description: "Expresses everything through beautiful, flowing verse and metaphor.",
        color: "dialog-pink",
        emoji: "✒️",
        avatar: None,
    },
    Persona {
        id: "detective",
        name: "Sherlock Holmes",
        role: "Deductive Genius",
        description: "Observes the details others miss and makes surprising deductions.",
        color: "dialog-cyan",
        emoji: "🔍",
        avatar: None,
    },
];

/// All registered personas, in display order.
pub fn list() -> &'static [Persona] {
    PERSONAS
}

/// Strict lookup by id.
pub fn find(id: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|p| p.id == id)
}

/// Lookup by id, falling back to the first registered persona for unknown ids.
///
/// The returned persona's id may differ from `id`. Use [`find`] to tell the
/// two cases apart.
pub fn get(id: &str) -> &'static Persona {
    find(id).unwrap_or(&PERSONAS[0])
}

// ============================================================================
// Scripts
// ============================================================================

struct PersonaScript {
    id: &'static str,
    welcome: &'static str,
    replies: &'static [&'static str],
}

const DEFAULT_WELCOME: &str = "Hello! How can I assist you today?";

const DEFAULT_REPLIES: &[&str] = &[
    "That's a fascinating perspective. Let me think about that.",
    "I understand what you're asking. Here's my thought...",
    "Interesting question! From my perspective...",
];

static SCRIPTS: &[PersonaScript] = &[
    PersonaScript {
        id: "captain",
        welcome: "Arr! What brings ye to me ship, landlubber? Speak up before I make ye walk the plank!",
        replies: &[
            "Arr! That be a fine question, matey!",
            "Blimey! Ye speak like a true landlubber!",
            "By Davy Jones' locker! I've sailed the seven seas and never heard such nonsense!",
        ],
    },
    PersonaScript {
        id: "zen",
        welcome: "Welcome, seeker. The path to wisdom begins with a single step. What brings you to this moment?",
        replies: &[
            "The answer you seek is within the question itself.",
            "Consider the bamboo: flexible yet unbreakable. This is the way of wisdom.",
            "The river flows without effort. Your mind should be the same.",
        ],
    },
    PersonaScript {
        id: "dev",
        welcome: "Hey there! *sips coffee* What are we building today? I've got like 17 tabs open and I'm READY TO CODE!",
        replies: &[
            "OMG! Let me refactor that for you real quick! *types furiously*",
            "Have you tried turning it off and on again? Just kidding, let's debug this!",
            "That's a feature, not a bug! But seriously, I can help optimize that.",
        ],
    },
    PersonaScript {
        id: "chef",
        welcome: "Bonjour! Welcome to my virtual kitchen. What delicious creation shall we discuss today?",
        replies: DEFAULT_REPLIES,
    },
    PersonaScript {
        id: "professor",
        welcome: "Ah, a new student! I'm delighted to engage in scholarly discourse. What subject shall we explore?",
        replies: DEFAULT_REPLIES,
    },
    PersonaScript {
        id: "poet",
        welcome: "Upon this digital page, two souls shall meet. What verses stir within your heart, dear friend?",
        replies: DEFAULT_REPLIES,
    },
    PersonaScript {
        id: "detective",
        welcome: "Interesting... *adjusts magnifying glass* I observe you've come seeking answers. The game is afoot!",
        replies: DEFAULT_REPLIES,
    },
];

fn script(id: &str) -> Option<&'static PersonaScript> {
    SCRIPTS.iter().find(|s| s.id == id)
}

/// The line a persona opens every conversation with.
pub fn welcome_message(id: &str) -> &'static str {
    script(id).map_or(DEFAULT_WELCOME, |s| s.welcome)
}

/// Canned reply templates used when no live backend is available.
pub fn canned_replies(id: &str) -> &'static [&'static str] {
    script(id).map_or(DEFAULT_REPLIES, |s| s.replies)
}
