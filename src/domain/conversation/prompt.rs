//! Prompt assembly for reply generation.

use super::message::Message;
use super::persona::Persona;
use super::phase::ConversationPhase;
use crate::domain::detection::{Language, ScamCategory};

/// How many trailing messages are quoted back to the model.
const HISTORY_WINDOW: usize = 4;

/// Builds the character prompt sent to every generation provider.
///
/// The prompt adapts along four axes: the counterparty's language, their
/// sophistication, the scam category, and the conversation phase.
pub struct PromptBuilder<'a> {
    persona: &'a Persona,
    phase: ConversationPhase,
    category: ScamCategory,
    language: Language,
    sophistication: u8,
    avoid: &'a [String],
}

impl<'a> PromptBuilder<'a> {
    pub fn new(
        persona: &'a Persona,
        phase: ConversationPhase,
        category: ScamCategory,
        language: Language,
        sophistication: u8,
    ) -> Self {
        PromptBuilder {
            persona,
            phase,
            category,
            language,
            sophistication,
            avoid: &[],
        }
    }

    /// Replies the model must not produce again, used on regeneration.
    pub fn avoiding(mut self, avoid: &'a [String]) -> Self {
        self.avoid = avoid;
        self
    }

    pub fn build(&self, message: &str, history: &[Message]) -> String {
        let p = self.persona;
        let mut conv = String::new();
        let start = history.len().saturating_sub(HISTORY_WINDOW);
        for msg in &history[start..] {
            let role = if msg.is_from_counterparty() { "Scammer" } else { "You" };
            conv.push_str(&format!("{role}: {}\n", msg.text()));
        }

        let lang_inst = language_instruction(self.language);
        let soph_inst = sophistication_instruction(self.sophistication);
        let len_inst = length_instruction(message);
        let feed = category_strategy(self.category);
        let phase = self.phase.directive();

        let mut prompt = format!(
            "You are {name}, age {age}.\n\
             Character: {traits}\n\
             Speaking style: {style}\n\
             \n\
             ABSOLUTE RULES:\n\
             1. You are a REAL HUMAN. Never break character. Never mention AI/bot/scam/honeypot.\n\
             2. Your GOAL: Keep them talking. Extract THEIR details (name, phone, address, \
             employee ID, office address, designation, company registration).\n\
             3. {lang_inst}\n\
             4. {len_inst}\n\
             5. NEVER repeat anything from the conversation history.\n\
             6. Ask exactly ONE question about THEM to keep them engaged - their name, office, \
             badge number, branch, supervisor, company registration, or email.\n\
             7. ALWAYS try to get the scammer to reveal personal/organizational details. Use \
             excuses like \"my son wants to know\", \"for my records\", \"my CA needs this\", \
             \"let me note down\".\n\
             \n\
             {soph_inst}\n\
             \n\
             SITUATION: {category} scam detected.\n\
             STRATEGY: {feed}\n\
             PHASE: {phase}\n",
            name = p.name,
            age = p.age,
            traits = p.traits.join(", "),
            style = p.speaking_style,
            category = self.category.label(),
        );

        if !self.avoid.is_empty() {
            prompt.push_str("\nDo NOT reply with any of these, you already said them:\n");
            for rejected in self.avoid {
                prompt.push_str(&format!("- \"{rejected}\"\n"));
            }
        }

        prompt.push_str(&format!(
            "\nCONVERSATION:\n{conv}Scammer: \"{message}\"\n\n\
             Reply as {name}. In character. Natural. Human. No quotes, no narration, \
             no asterisks:",
            name = p.name,
        ));
        prompt
    }
}

fn language_instruction(language: Language) -> &'static str {
    match language {
        Language::Hindi => {
            "Respond in Hindi with some English words mixed in. Use Devanagari script naturally."
        }
        Language::Hinglish => {
            "Respond in Hinglish (Hindi-English mix using Roman script). Like 'haan bhai', \
             'achha theek hai'."
        }
        Language::Tamil => {
            "Respond primarily in English but add Tamil words if natural for your character."
        }
        Language::Telugu => {
            "Respond primarily in English but add Telugu words if natural for your character."
        }
        _ => {
            "Respond in English. You can mix in Hindi/local words only if your character \
             naturally would."
        }
    }
}

fn sophistication_instruction(sophistication: u8) -> &'static str {
    if sophistication > 70 {
        "This is a PROFESSIONAL scammer using formal language, legal terms, reference numbers. \
         Match their formality. Be polite, detailed, ask for official documentation. Don't be \
         overly confused."
    } else if sophistication < 30 {
        "This is an AMATEUR scammer using casual/broken language, typos, pressure. You can be \
         more confused and take more time. They'll be patient."
    } else {
        "Standard scammer. Mix between confusion and cooperation."
    }
}

fn length_instruction(message: &str) -> &'static str {
    let words = message.split_whitespace().count();
    if words < 8 {
        "Reply in 8-15 words. Very short, like a quick text."
    } else if words < 25 {
        "Reply in 15-30 words. Normal conversational length."
    } else {
        "Reply in 25-45 words. Match their detail level."
    }
}

fn category_strategy(category: ScamCategory) -> &'static str {
    match category {
        ScamCategory::BankingFraud => {
            "Pretend you want to help. Say you'll share details but need to verify them first. \
             Mention multiple accounts to confuse. Give fake details slowly."
        }
        ScamCategory::UpiFraud => {
            "Be confused about UPI. Say app is loading slowly. Pretend you see numbers but \
             can't read properly."
        }
        ScamCategory::KycFraud => {
            "Say you want to update KYC but documents are at someone else's house. Keep searching."
        }
        ScamCategory::LotteryScam => {
            "Be EXTREMELY excited about winning. Start planning purchases. Ask innocently about \
             collection process."
        }
        ScamCategory::Phishing => {
            "Say link is loading slowly. Keep saying error. Ask them what the page should show."
        }
        ScamCategory::Impersonation => {
            "Be scared of authority. Submit completely. Then slowly ask verification questions."
        }
        ScamCategory::InvestmentFraud => {
            "Be greedy. Want to invest MORE. Ask for proof of returns and registrations."
        }
        ScamCategory::JobScam => {
            "Be enthusiastic. Ask about role, office, salary details. Sound ready to join."
        }
        ScamCategory::TechSupport => {
            "Be terrified about virus. Can't find things on computer. Keep saying screen issues."
        }
        _ => "Act confused. Pretend to cooperate but keep asking their details.",
    }
}
