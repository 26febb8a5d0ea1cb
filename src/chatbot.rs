//! Rule-based gardening chatbot.
//!
//! Replies are tried in order: knowledge base, arithmetic, quick tips, then
//! an optional web [`Searcher`].

use std::time::Duration;

use serde::Deserialize;

use crate::error::{GardenError, Result};

pub const EMPTY_QUESTION: &str = "Please type a question!";
pub const SEARCH_FAILED: &str = "Could not fetch info.";
pub const NO_RESULTS: &str = "No results found.";
pub const WAKE_WORD: &str = "sherwon";
pub const WAKE_WORD_PROMPT: &str = "Please start your command by saying Sherwon.";

pub const KNOWLEDGE: [(&str, &str); 18] = [
    ("soil", "🌍 Soil is the top layer of the earth that supports plant life. It contains minerals, organic matter, water, and air."),
    ("types of soil", "🪴 Main types of soil are: Sandy (drains fast), Clay (holds water), Loamy (best for crops), and Silt (smooth and fertile)."),
    ("farming", "🚜 Farming is the process of growing crops and raising animals for food, materials, or income."),
    ("purpose of farming", "🌾 The purpose of farming is to produce food, create jobs, and sustain life on earth."),
    ("pests", "🐛 Pests are insects or animals that harm crops, such as aphids, caterpillars, or beetles."),
    ("how to prevent pests", "🐞 Prevent pests by using natural repellents (neem oil, garlic spray), crop rotation, and keeping your garden clean."),
    ("fertilizer", "🌿 Fertilizers are nutrients added to soil to help plants grow. There are organic ones (compost, manure) and chemical ones (NPK)."),
    ("organic farming", "🍀 Organic farming avoids chemical fertilizers or pesticides. It uses compost, natural pest control, and crop rotation."),
    ("irrigation", "💧 Irrigation is the process of watering crops using methods like drip irrigation, sprinklers, or channels."),
    ("irrigation methods", "🚿 Main methods: Drip (saves water), Sprinkler (like rain), Surface (channels or furrows), and Manual watering."),
    ("crop rotation", "🔄 Crop rotation means planting different crops in the same soil each season to keep it healthy and reduce pests."),
    ("tools used in farming", "🛠️ Common tools: hoe, shovel, rake, tractor, watering can, and wheelbarrow."),
    ("harvesting", "🌾 Harvesting is the process of collecting mature crops from the fields. Timing is key to getting good yield."),
    ("learn farming", "📘 3 Simple Ways to Learn Farming:\n1️⃣ Start small with a home garden.\n2️⃣ Watch YouTube or attend workshops.\n3️⃣ Visit local farms for hands-on experience."),
    ("seed germination", "🌱 Germination is when a seed starts to grow roots and shoots. It needs water, warmth, and air."),
    ("plant growth stages", "🌿 Plant growth has 5 main stages: Seed, Germination, Seedling, Vegetative, and Flowering/Fruiting."),
    ("climate and farming", "☀️ Different crops grow in different climates. Maize likes warm weather, while cabbage grows in cool areas."),
    ("sustainable farming", "🌎 Sustainable farming protects the environment by saving water, using renewable energy, and avoiding harmful chemicals."),
];

const WATER_TIP: &str =
    "💧 Water plants early in the morning or evening, about 2–3 times per week depending on soil moisture.";
const PEST_TIP: &str = "🐞 Use neem oil, garlic spray, or marigolds to naturally control pests.";
const PLANT_TIP: &str =
    "🌱 Start with easy crops like spinach, lettuce, or tomatoes. They grow quickly and require little care.";

/// Web lookup used when no local rule answers.
pub trait Searcher {
    /// First result snippet, `None` when the search found nothing.
    fn search(&self, query: &str) -> Result<Option<String>>;
}

/// Knowledge-base answer for `question`; the longest matching topic wins.
pub fn lookup_knowledge(question: &str) -> Option<&'static str> {
    let q = question.to_lowercase();
    KNOWLEDGE
        .iter()
        .filter(|(key, _)| q.contains(key))
        .max_by_key(|(key, _)| key.len())
        .map(|(_, answer)| *answer)
}

fn quick_tip(question: &str) -> Option<&'static str> {
    let q = question.to_lowercase();
    if q.contains("water") {
        Some(WATER_TIP)
    } else if q.contains("pest") {
        Some(PEST_TIP)
    } else if q.contains("what to plant") || q.contains("what can i plant") {
        Some(PLANT_TIP)
    } else {
        None
    }
}

/// Strip the wake word from a voice transcript.
///
/// Returns the remaining command, or [`WAKE_WORD_PROMPT`] as the error when
/// the transcript never mentions the assistant.
pub fn voice_command(transcript: &str) -> std::result::Result<String, &'static str> {
    let t = transcript.trim().to_lowercase();
    if !t.contains(WAKE_WORD) {
        return Err(WAKE_WORD_PROMPT);
    }
    Ok(t.replacen(WAKE_WORD, "", 1).trim().to_string())
}

#[derive(Default)]
pub struct Chatbot {
    searcher: Option<Box<dyn Searcher>>,
}

impl Chatbot {
    pub fn new() -> Self {
        Chatbot { searcher: None }
    }

    pub fn with_searcher(searcher: Box<dyn Searcher>) -> Self {
        Chatbot {
            searcher: Some(searcher),
        }
    }

    pub fn reply(&self, question: &str) -> String {
        let question = question.trim();
        if question.is_empty() {
            return EMPTY_QUESTION.to_string();
        }
        if let Some(answer) = lookup_knowledge(question) {
            return answer.to_string();
        }
        if let Some(value) = solve_arithmetic(question) {
            return format!("Answer: {value}");
        }
        if let Some(tip) = quick_tip(question) {
            return tip.to_string();
        }
        self.search(question)
    }

    fn search(&self, question: &str) -> String {
        let Some(searcher) = &self.searcher else {
            return SEARCH_FAILED.to_string();
        };
        match searcher.search(question) {
            Ok(Some(snippet)) => snippet,
            Ok(None) => NO_RESULTS.to_string(),
            Err(e) => {
                log::warn!("search failed: {e}");
                SEARCH_FAILED.to_string()
            }
        }
    }
}

/// Google Custom Search JSON API.
pub struct CustomSearch {
    client: reqwest::blocking::Client,
    api_key: String,
    engine_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    snippet: String,
}

impl CustomSearch {
    pub const URL: &'static str = "https://www.googleapis.com/customsearch/v1";

    pub fn new(api_key: &str, engine_id: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(CustomSearch {
            client,
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
        })
    }
}

/// First snippet of a Custom Search response body.
pub fn first_snippet(body: &str) -> Result<Option<String>> {
    let resp: SearchResponse = serde_json::from_str(body)?;
    Ok(resp.items.into_iter().next().map(|i| i.snippet))
}

impl Searcher for CustomSearch {
    fn search(&self, query: &str) -> Result<Option<String>> {
        let resp = self
            .client
            .get(Self::URL)
            .query(&[("key", self.api_key.as_str()), ("cx", self.engine_id.as_str()), ("q", query)])
            .send()?;
        if !resp.status().is_success() {
            return Err(GardenError::Http(format!("search returned {}", resp.status())));
        }
        first_snippet(&resp.text()?)
    }
}

/// Evaluate `input` when it is plain arithmetic (digits, `+ - * / ( ) .`, spaces).
///
/// Returns `None` for anything else, for malformed expressions and for
/// non-finite results such as division by zero.
pub fn solve_arithmetic(input: &str) -> Option<f64> {
    let allowed = |c: char| c.is_ascii_digit() || "+-*/().".contains(c) || c.is_whitespace();
    if input.trim().is_empty() || !input.chars().all(allowed) {
        return None;
    }
    let mut parser = Arith { src: input.as_bytes(), pos: 0, depth: 0 };
    let value = parser.expr()?;
    if parser.peek().is_some() || !value.is_finite() {
        return None;
    }
    Some(value)
}

/// Deepest nesting of parentheses and signs the solver accepts.
const MAX_NESTING: usize = 256;

struct Arith<'a> {
    src: &'a [u8],
    pos: usize,
    depth: usize,
}

impl Arith<'_> {
    /// Next token byte, skipping whitespace between tokens.
    fn peek(&mut self) -> Option<u8> {
        while self.src.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
        self.src.get(self.pos).copied()
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == b'+' { value + rhs } else { value - rhs };
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.unary()?;
        while let Some(op @ (b'*' | b'/')) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = if op == b'*' { value * rhs } else { value / rhs };
        }
        Some(value)
    }

    fn unary(&mut self) -> Option<f64> {
        if self.depth >= MAX_NESTING {
            return None;
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Option<f64> {
        match self.peek()? {
            b'-' => {
                self.pos += 1;
                Some(-self.unary()?)
            }
            b'+' => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Option<f64> {
        if self.peek()? == b'(' {
            self.pos += 1;
            let value = self.expr()?;
            if self.peek()? != b')' {
                return None;
            }
            self.pos += 1;
            return Some(value);
        }
        let start = self.pos;
        while matches!(self.src.get(self.pos), Some(b'0'..=b'9' | b'.')) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.src[start..self.pos]).ok()?.parse().ok()
    }
}
