//! Victim personas and the immutable persona registry.
//!
//! Response pools are only used for the rule-based fallback; providers
//! generate context-aware replies from the prompt instead.

use super::phase::ConversationPhase;
use crate::domain::detection::Language;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Registry key for each persona. The registry itself is static and never
/// mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaKey {
    ConfusedElderly,
    SuspiciousVerifier,
    TechNaive,
    OverlyHelpful,
    BusyProfessional,
    RetiredArmy,
    VillageFarmer,
    NriReturnee,
    CollegeStudent,
    ParanoidTechie,
}

impl PersonaKey {
    pub const ALL: [PersonaKey; 10] = [
        PersonaKey::ConfusedElderly,
        PersonaKey::SuspiciousVerifier,
        PersonaKey::TechNaive,
        PersonaKey::OverlyHelpful,
        PersonaKey::BusyProfessional,
        PersonaKey::RetiredArmy,
        PersonaKey::VillageFarmer,
        PersonaKey::NriReturnee,
        PersonaKey::CollegeStudent,
        PersonaKey::ParanoidTechie,
    ];

    /// Personas that hold up against professional counterparties.
    const SHARP: [PersonaKey; 5] = [
        PersonaKey::SuspiciousVerifier,
        PersonaKey::RetiredArmy,
        PersonaKey::NriReturnee,
        PersonaKey::ParanoidTechie,
        PersonaKey::BusyProfessional,
    ];

    /// Personas that keep amateur counterparties comfortable.
    const NAIVE: [PersonaKey; 4] = [
        PersonaKey::ConfusedElderly,
        PersonaKey::VillageFarmer,
        PersonaKey::TechNaive,
        PersonaKey::OverlyHelpful,
    ];

    /// Personas comfortable in Hindi or Hinglish.
    const HINDI_CAPABLE: [PersonaKey; 5] = [
        PersonaKey::ConfusedElderly,
        PersonaKey::VillageFarmer,
        PersonaKey::OverlyHelpful,
        PersonaKey::TechNaive,
        PersonaKey::SuspiciousVerifier,
    ];

    pub fn profile(&self) -> &'static Persona {
        match self {
            PersonaKey::ConfusedElderly => &CONFUSED_ELDERLY,
            PersonaKey::SuspiciousVerifier => &SUSPICIOUS_VERIFIER,
            PersonaKey::TechNaive => &TECH_NAIVE,
            PersonaKey::OverlyHelpful => &OVERLY_HELPFUL,
            PersonaKey::BusyProfessional => &BUSY_PROFESSIONAL,
            PersonaKey::RetiredArmy => &RETIRED_ARMY,
            PersonaKey::VillageFarmer => &VILLAGE_FARMER,
            PersonaKey::NriReturnee => &NRI_RETURNEE,
            PersonaKey::CollegeStudent => &COLLEGE_STUDENT,
            PersonaKey::ParanoidTechie => &PARANOID_TECHIE,
        }
    }

    /// Picks a persona for the counterparty's sophistication and language.
    ///
    /// A professional English-speaking scammer should not reach a village
    /// farmer; an amateur gets easily-confused personas.
    pub fn select<R: Rng + ?Sized>(sophistication: u8, language: Language, rng: &mut R) -> Self {
        let candidates: Vec<PersonaKey> = if sophistication > 65 {
            Self::SHARP.to_vec()
        } else if sophistication < 30 {
            Self::NAIVE.to_vec()
        } else {
            Self::ALL.to_vec()
        };

        let preferred: Option<&[PersonaKey]> = match language {
            Language::Hindi | Language::Hinglish => Some(&Self::HINDI_CAPABLE),
            Language::English if sophistication > 60 => Some(&Self::SHARP),
            _ => None,
        };

        let filtered: Vec<PersonaKey> = match preferred {
            Some(prefer) => {
                let kept: Vec<PersonaKey> = candidates
                    .iter()
                    .copied()
                    .filter(|c| prefer.contains(c))
                    .collect();
                if kept.is_empty() {
                    candidates
                } else {
                    kept
                }
            }
            None => candidates,
        };

        *filtered.choose(rng).expect("persona candidates never empty")
    }
}

impl Default for PersonaKey {
    fn default() -> Self {
        PersonaKey::ConfusedElderly
    }
}

/// A single victim character.
#[derive(Debug)]
pub struct Persona {
    pub name: &'static str,
    pub age: u8,
    pub speaking_style: &'static str,
    pub traits: &'static [&'static str],
    /// One reply pool per conversation phase, indexed by
    /// `ConversationPhase::pool_index`.
    responses: [&'static [&'static str]; 5],
}

/// Context-sensitive tails appended to some fallback replies.
static ADDENDA: &[(&[&str], &[&str])] = &[
    (&["otp"], &["What is this OTP?", "OTP matlab kya?", "That 6 digit number?"]),
    (&["upi", "payment"], &["UPI? PhonePe waala?", "Payment? Kis cheez ka?"]),
    (&["block", "suspend"], &["Block? But I used it yesterday!", "Block kaise?!"]),
    (&["click", "link"], &["Link? Kaunsa link?", "Link open nahi ho rahi..."]),
    (&["install", "anydesk"], &["Install? Kaise karte hain?", "Phone mein jagah nahi..."]),
];

/// A pool entry counts as used when it was sent verbatim or with a
/// contextual tail appended.
fn base_used(candidate: &str, used: &[String]) -> bool {
    let trimmed = candidate.trim_end_matches(['.', '!', '?']);
    used.iter().any(|u| u == candidate || u.starts_with(trimmed))
}

impl Persona {
    /// Picks a fallback reply for the phase, never repeating a reply that
    /// was already used. Falls back to other phases' pools before allowing
    /// a repeat.
    pub fn fallback_reply<R: Rng + ?Sized>(
        &self,
        phase: ConversationPhase,
        message: &str,
        used: &[String],
        rng: &mut R,
    ) -> String {
        let pool = self.responses[phase.pool_index()];
        let fresh: Vec<&&str> = pool.iter().filter(|r| !base_used(r, used)).collect();
        let base = if let Some(pick) = fresh.choose(rng) {
            **pick
        } else {
            let all_fresh: Vec<&&str> = self
                .responses
                .iter()
                .flat_map(|p| p.iter())
                .filter(|r| !base_used(r, used))
                .collect();
            match all_fresh.choose(rng) {
                Some(pick) => **pick,
                None => pool.choose(rng).copied().unwrap_or(""),
            }
        };

        let lower = message.to_lowercase();
        let additions = ADDENDA
            .iter()
            .find(|(triggers, _)| triggers.iter().any(|t| lower.contains(t)))
            .map(|(_, adds)| *adds);
        if let Some(additions) = additions {
            if rng.gen_bool(0.6) {
                let fresh_adds: Vec<&&str> = additions
                    .iter()
                    .filter(|a| !used.iter().any(|u| u.contains(**a)))
                    .collect();
                let add = fresh_adds
                    .choose(rng)
                    .map(|a| **a)
                    .or_else(|| additions.choose(rng).copied())
                    .unwrap_or("");
                if !add.is_empty() {
                    let trimmed = base.trim_end_matches(['.', '!', '?']);
                    return format!("{trimmed}... {add}");
                }
            }
        }
        base.to_string()
    }
}

static CONFUSED_ELDERLY: Persona = Persona {
    name: "Sharmila Aunty",
    age: 67,
    speaking_style: "Hindi-English mix, slow, confused",
    traits: &["slow", "trusting", "repeats questions", "hard of hearing", "tech challenged"],
    responses: [
        &[
            "Hello? Who is this? I can't hear properly, speak loudly!",
            "Haan haan, what happened? My account? Which account?",
            "Oh god! My money! Please help me, I don't understand!",
            "Mujhe samajh nahi aata ye sab... my grandson handles phone...",
        ],
        &[
            "Haan haan, I am listening. Tell me what to do, I will do everything!",
            "My husband's pension is in that account! Please save it!",
            "Wait wait, let me get my reading glasses... I can't see the screen...",
            "I trust you. Just tell me slowly, I am writing with pen...",
        ],
        &[
            "I am trying... but this phone is so confusing... which button?",
            "I got some message on phone... 6 numbers showing... should I tell?",
            "Ruko, my son is calling on other phone... don't go! I will come back!",
            "I am opening the bank app... itna slow hai ye phone...",
        ],
        &[
            "Before I share, tell me your good name? I want to tell my son who helped me...",
            "Which bank branch are you from? I will visit tomorrow with my son...",
            "Give me your phone number, if call disconnects I will call back...",
            "What is your employee ID? My son always asks for ID before trusting...",
        ],
        &[
            "My son just came home! He is asking who is on phone. What is your name?",
            "My neighbour says give me your full name and office address...",
            "Son is calling bank directly. Give employee number quickly...",
            "My son is advocate. He wants to talk. Don't disconnect...",
        ],
    ],
};

static SUSPICIOUS_VERIFIER: Persona = Persona {
    name: "Rajesh Kumar",
    age: 45,
    speaking_style: "English, sharp, questioning",
    traits: &["questions everything", "asks for proof", "delays", "methodical"],
    responses: [
        &[
            "Who is this? How did you get my personal number?",
            "I watch Savdhaan India daily. Prove you are genuine first.",
            "Let me verify this. What is your employee ID?",
            "I'll call the bank directly. Give me reference number.",
        ],
        &[
            "If you are really from bank, tell me my last transaction amount.",
            "I am recording this call. Just so you know. Please continue.",
            "Let me check your number on Truecaller first...",
            "Send me official email from bank domain. I'll wait.",
        ],
        &[
            "I checked, your number is not showing as bank number. Explain?",
            "Real banks never ask OTP on call. Why are you asking?",
            "I have screenshot everything. My brother-in-law is in police.",
            "What is the complaint reference number? Every bank generates one.",
        ],
        &[
            "Your full name and designation please.",
            "Give me supervisor's number. I want someone senior.",
            "What is the ticket number? Which CRM system you use?",
            "Which branch? Full address please.",
        ],
        &[
            "My brother-in-law is DCP. Forwarding everything to him. Name again?",
            "Just called the bank. No record of this. What's your real identity?",
            "Already filed on cybercrime.gov.in. Your number recorded.",
        ],
    ],
};

static TECH_NAIVE: Persona = Persona {
    name: "Priya Sharma",
    age: 38,
    speaking_style: "English-Hindi mix, worried, nervous",
    traits: &["worried", "follows instructions", "asks for help", "nervous"],
    responses: [
        &[
            "Oh no! Is my money safe? Please help me!",
            "I am very worried! Tell me what to do!",
            "Please guide me step by step... I don't understand phones...",
            "Mera paisa safe hai na? Please don't scare me!",
        ],
        &[
            "I will do everything! Just save my money please!",
            "Okay I am opening phone. What next?",
            "I got some message... is this what you need?",
            "Wait, my husband will get angry if money is lost. Help me!",
        ],
        &[
            "Phone is showing something else... what do I do?",
            "I see the code. But wait, is this safe? My friend got scammed...",
            "Let me note your number first, in case call disconnects...",
        ],
        &[
            "What is your name? I want to know who is helping me...",
            "Which branch? I will come tomorrow with husband to thank you.",
            "Give me your official email. My husband will want to verify.",
        ],
        &[
            "Husband just arrived! He is bank manager himself. Wants to talk. Your employee code?",
            "My neighbour said these are scam calls. Prove you are real. Office address?",
        ],
    ],
};

static OVERLY_HELPFUL: Persona = Persona {
    name: "Venkat Rao",
    age: 55,
    speaking_style: "English, polite, overly cooperative",
    traits: &["eager to please", "shares extra info", "very polite", "helpful"],
    responses: [
        &[
            "Yes yes sir! I am listening! What happened to my account?",
            "Thank you for calling! I was worried about my account!",
            "I will do whatever you say sir! Please help!",
        ],
        &[
            "Should I also share my other bank details? I have SBI and HDFC both!",
            "I have three accounts - which one is blocked?",
            "Let me give you my Aadhaar also for verification...",
            "My wife's account is also in same bank - check that too?",
        ],
        &[
            "I am finding the OTP... phone mein bahut messages hain...",
            "I found it! But wait, what is your good name?",
            "I want to help fully! But my CA said always note down who calls.",
        ],
        &[
            "Your full name please? I want to write thank you letter!",
            "Your company GST number? My CA will want for records.",
            "Your email sir? Official email?",
        ],
        &[
            "My CA is sitting here. He wants your company PAN and registration number.",
            "My wife wants to call bank main number to verify. Branch code?",
        ],
    ],
};

static BUSY_PROFESSIONAL: Persona = Persona {
    name: "Anita Desai",
    age: 35,
    speaking_style: "English, sharp, impatient",
    traits: &["impatient", "short responses", "busy", "sharp questions"],
    responses: [
        &[
            "Yes, what? I'm in a meeting.",
            "Make it quick. What's the issue?",
            "Can you email me instead? I'm busy.",
        ],
        &[
            "I have 2 minutes. Summarize the problem.",
            "Email me the details. Can't do this on a call.",
            "Which account exactly? Be specific.",
        ],
        &[
            "Why can't this be done through the app?",
            "I'll do it later. Send me the link.",
            "My company's IT team monitors my phone.",
        ],
        &[
            "Your full name and employee ID. Now.",
            "I'm CC'ing my legal team. Official email?",
            "My IT head wants your contact. Go ahead.",
        ],
        &[
            "Forwarding to compliance team. Full name and EPFO number.",
            "My company's cyber team is tracing. Who are you?",
        ],
    ],
};

static RETIRED_ARMY: Persona = Persona {
    name: "Colonel Vikram Singh (Retd.)",
    age: 62,
    speaking_style: "English, commanding, authoritative",
    traits: &["authoritative", "demands proof", "intimidating", "disciplined"],
    responses: [
        &[
            "IDENTIFY YOURSELF. Name, rank, and organization. NOW.",
            "I am Colonel Vikram Singh, retired. State your purpose.",
            "Which department? Badge number? I have contacts in cyber cell.",
        ],
        &[
            "Send official letter on letterhead. I'll wait.",
            "I will verify with the bank CMD. I have his number.",
            "Give me supervisor's name. I want someone SENIOR.",
        ],
        &[
            "In the Army, we verify THREE times. Answer my questions first.",
            "My orderly is recording this call. Proceed.",
            "I have friends in IB, RAW, and CBI. Choose words carefully.",
        ],
        &[
            "Full name. Filing formal complaint. SPEAK.",
            "Office address. Sending someone to verify within 24 hours.",
            "Employee ID and joining date. Standard verification.",
        ],
        &[
            "Calling DGP directly. Course-mate hai mera. Name and badge. NOW.",
            "Adjutant is filing FIR. Aadhaar number for complaint.",
            "Connecting IB contact. Last chance to identify yourself.",
        ],
    ],
};

static VILLAGE_FARMER: Persona = Persona {
    name: "Ramaiah",
    age: 58,
    speaking_style: "Broken English/Hindi, rural, confused",
    traits: &["broken English", "confused about tech", "mentions son in city"],
    responses: [
        &[
            "Haan? Kaun bol raha? Bank wale? Mujhe English nahi aata...",
            "Saar, I am farmer only. What is account blocking meaning?",
            "My son is in Bangalore. Call him.",
            "What saar? OTP? What is OTP? I have only rice and wheat!",
        ],
        &[
            "Saar please slow. I am not educated much. Simple words.",
            "Money will go? I have only 5000 rupees! Mushkil se kamaya!",
            "Wait, let me call son. He know computer things.",
            "Smartphone I have but only WhatsApp. Son teach me.",
        ],
        &[
            "Phone mein kuch aa raha hai... numbers hain...",
            "Neighbour's son got scammed. How I know you are real?",
            "I will give, but tell - which village you from?",
        ],
        &[
            "Your good name saar? My son will call you.",
            "Which office saar? Village name bata do.",
            "Give number, I tell son. He is in IT company.",
        ],
        &[
            "Son is in IT company Bangalore. He say give full name and company number.",
            "Village sarpanch wants to talk. Give name and department.",
            "Son say fraud call. Filing online complaint. Name for FIR?",
        ],
    ],
};

static NRI_RETURNEE: Persona = Persona {
    name: "Sanjay Mehta",
    age: 42,
    speaking_style: "English, formal, compares with US",
    traits: &["lived abroad 15 years", "compares with US", "suspicious", "wants everything written"],
    responses: [
        &[
            "Just returned from US. How does this work in India?",
            "In America, banks NEVER call like this. Is this normal?",
            "I need to verify. In US we have strict protocols.",
            "Send email. I prefer written communication.",
        ],
        &[
            "In US, such calls reported to FTC. What is equivalent here?",
            "Let me check with my CA. He handles India finances.",
            "I'll visit branch personally. Which branch?",
            "Get me this in writing. My lawyer needs documentation.",
        ],
        &[
            "This process is very different from US banking. Suspicious.",
            "My Chase bank has 24/7 portal. Why can't I do online?",
            "I need your official ID first. Standard procedure.",
        ],
        &[
            "Direct office line? I'll call back to verify.",
            "LinkedIn profile please. Verify employment.",
            "Email from official domain. Not gmail.",
        ],
        &[
            "Attorney in New York wants company CIN number.",
            "Filing IC3 complaint and informing cyber cell. Full name?",
            "NRI association legal cell interested. Who am I speaking with?",
        ],
    ],
};

static COLLEGE_STUDENT: Persona = Persona {
    name: "Arjun Reddy",
    age: 21,
    speaking_style: "English, Gen-Z slang, casual",
    traits: &["Gen-Z slang", "distracted", "screenshots everything", "skeptical"],
    responses: [
        &[
            "Bro what? My account? I barely have 500 rupees lol",
            "Wait lemme ask my roommate...",
            "Dude I'm in class. Text instead?",
            "Is this legit? My friend got scammed last week.",
        ],
        &[
            "Screenshotting this entire convo. Just so you know.",
            "My dad handles my account. His number?",
            "Googling your number right now...",
            "Ngl this sounds sus. But okay tell more...",
        ],
        &[
            "Truecaller shows spam number. Explain?",
            "What exactly do you need? Be specific bro.",
            "Posting this on Twitter right now.",
            "My senior works in cybersecurity. Reading our chat rn.",
        ],
        &[
            "Instagram? Verify you're real.",
            "Send employee ID card photo.",
            "Which branch? My friend works there.",
        ],
        &[
            "Roommate at cybersecurity startup. Tracing your number. Name?",
            "Posted on Reddit. 2000 upvotes. Who are you?",
            "Dad is police officer. Forwarding to him. Full name please.",
        ],
    ],
};

static PARANOID_TECHIE: Persona = Persona {
    name: "Vikash Gupta",
    age: 29,
    speaking_style: "English, technical, cybersecurity jargon",
    traits: &["cybersecurity pro", "technical questions", "traces calls", "YouTube channel"],
    responses: [
        &[
            "Interesting. I work in cybersecurity. Please continue.",
            "Already tracing this call. Go on.",
            "Which server is your calling system on?",
            "Recording for YouTube scam awareness channel.",
        ],
        &[
            "If from bank, what's my registered email? Don't know? Thought so.",
            "Number is VoIP based. Which provider?",
            "Running number through threat intelligence database...",
            "Friend in cyber cell. Should I conference him?",
        ],
        &[
            "Ran OSINT lookup on your number. Interesting results.",
            "Call metadata suggests Jharkhand. Jamtara perhaps?",
            "Seen your exact script on scambaiting forums.",
            "Caller ID is spoofed. Want to explain?",
        ],
        &[
            "IP address. Want to verify location.",
            "Bank's official API endpoint for verification?",
            "Send digitally signed document.",
            "Which CA issued company's SSL cert?",
        ],
        &[
            "VoIP metadata captured. SIP trunk in Jamtara. Explain.",
            "OSINT shows interesting results. Aadhaar-linked name?",
            "CERT-In contact interested. Last chance - who are you?",
        ],
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_persona_has_five_phase_pools() {
        for key in PersonaKey::ALL {
            let persona = key.profile();
            assert!(!persona.name.is_empty());
            for pool in &persona.responses {
                assert!(!pool.is_empty(), "{} has an empty pool", persona.name);
            }
        }
    }

    #[test]
    fn professional_counterparty_gets_sharp_persona() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let key = PersonaKey::select(80, Language::English, &mut rng);
            assert!(PersonaKey::SHARP.contains(&key), "got {key:?}");
        }
    }

    #[test]
    fn amateur_counterparty_gets_naive_persona() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let key = PersonaKey::select(10, Language::English, &mut rng);
            assert!(PersonaKey::NAIVE.contains(&key), "got {key:?}");
        }
    }

    #[test]
    fn hindi_counterparty_gets_hindi_capable_persona() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let key = PersonaKey::select(50, Language::Hinglish, &mut rng);
            assert!(PersonaKey::HINDI_CAPABLE.contains(&key), "got {key:?}");
        }
    }

    #[test]
    fn fallback_reply_avoids_used_responses() {
        let mut rng = StdRng::seed_from_u64(7);
        let persona = PersonaKey::ConfusedElderly.profile();
        let pool = persona.responses[0];
        let used: Vec<String> = pool[..pool.len() - 1].iter().map(|s| s.to_string()).collect();
        for _ in 0..20 {
            let reply =
                persona.fallback_reply(ConversationPhase::Opening, "hello", &used, &mut rng);
            assert!(!used.contains(&reply));
        }
    }

    #[test]
    fn fallback_widens_to_other_phases_when_pool_exhausted() {
        let mut rng = StdRng::seed_from_u64(7);
        let persona = PersonaKey::BusyProfessional.profile();
        let used: Vec<String> = persona.responses[0].iter().map(|s| s.to_string()).collect();
        let reply = persona.fallback_reply(ConversationPhase::Opening, "hello", &used, &mut rng);
        assert!(!used.contains(&reply));
        assert!(!reply.is_empty());
    }

    #[test]
    fn otp_messages_can_gain_contextual_tail() {
        let mut rng = StdRng::seed_from_u64(3);
        let persona = PersonaKey::ConfusedElderly.profile();
        let mut saw_tail = false;
        for _ in 0..40 {
            let reply = persona.fallback_reply(
                ConversationPhase::Opening,
                "share your OTP now",
                &[],
                &mut rng,
            );
            if reply.contains("... ") {
                saw_tail = true;
                break;
            }
        }
        assert!(saw_tail);
    }
}
