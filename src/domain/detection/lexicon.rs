//! Static lexicons and pattern tables backing the detector.
//!
//! Keyword tables cover English, Hinglish, and major Indic scripts. All
//! entries are stored lowercase; callers match against lowercased text.

use super::verdict::ScamCategory;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Weighted keyword signal categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Urgency,
    Threat,
    CredentialRequest,
    MoneyRequest,
    Reward,
    Impersonation,
    Kyc,
    TechScam,
    InvestmentScam,
}

impl SignalCategory {
    pub const ALL: [SignalCategory; 9] = [
        SignalCategory::Urgency,
        SignalCategory::Threat,
        SignalCategory::CredentialRequest,
        SignalCategory::MoneyRequest,
        SignalCategory::Reward,
        SignalCategory::Impersonation,
        SignalCategory::Kyc,
        SignalCategory::TechScam,
        SignalCategory::InvestmentScam,
    ];

    /// Per-hit weight contributed to the keyword layer score.
    pub fn weight(&self) -> f64 {
        match self {
            SignalCategory::Urgency => 0.12,
            SignalCategory::Threat => 0.20,
            SignalCategory::CredentialRequest => 0.25,
            SignalCategory::MoneyRequest => 0.20,
            SignalCategory::Reward => 0.12,
            SignalCategory::Impersonation => 0.18,
            SignalCategory::Kyc => 0.18,
            SignalCategory::TechScam => 0.18,
            SignalCategory::InvestmentScam => 0.22,
        }
    }

    /// Snake-case name used in explanations and serialized breakdowns.
    pub fn label(&self) -> &'static str {
        match self {
            SignalCategory::Urgency => "urgency",
            SignalCategory::Threat => "threat",
            SignalCategory::CredentialRequest => "credential_request",
            SignalCategory::MoneyRequest => "money_request",
            SignalCategory::Reward => "reward",
            SignalCategory::Impersonation => "impersonation",
            SignalCategory::Kyc => "kyc",
            SignalCategory::TechScam => "tech_scam",
            SignalCategory::InvestmentScam => "investment_scam",
        }
    }

    /// Keyword table for this category, all lowercase.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            SignalCategory::Urgency => URGENCY_KEYWORDS,
            SignalCategory::Threat => THREAT_KEYWORDS,
            SignalCategory::CredentialRequest => CREDENTIAL_KEYWORDS,
            SignalCategory::MoneyRequest => MONEY_KEYWORDS,
            SignalCategory::Reward => REWARD_KEYWORDS,
            SignalCategory::Impersonation => IMPERSONATION_KEYWORDS,
            SignalCategory::Kyc => KYC_KEYWORDS,
            SignalCategory::TechScam => TECH_KEYWORDS,
            SignalCategory::InvestmentScam => INVESTMENT_KEYWORDS,
        }
    }
}

static URGENCY_KEYWORDS: &[&str] = &[
    "urgent", "immediately", "now", "today only", "last chance", "expires", "hurry", "quick",
    "asap", "limited time", "act now", "deadline", "emergency", "fast", "quickly", "right now",
    "don't delay", "time sensitive", "expiring", "within hours", "minutes left",
    "jaldi", "abhi", "turant", "foran", "jald se jald",
    "तुरंत", "अभी", "जल्दी", "फौरन", "आखिरी मौका", "समय सीमा", "देर न करें",
    "உடனடியாக", "இப்போது", "அவசரம்", "விரைவாக",
    "వెంటనే", "ఇప్పుడు", "త్వరగా", "ఆలస్యం చేయకండి",
    "ತಕ್ಷಣ", "ಈಗಲೇ", "ಬೇಗ", "ഉടനെ", "ഇപ്പോൾ", "വേഗം",
    "এখনই", "তাড়াতাড়ি", "জরুরি", "लगेच", "आता", "तातडीने",
];

static THREAT_KEYWORDS: &[&str] = &[
    "blocked", "suspended", "frozen", "legal action", "police", "arrest", "court", "penalty",
    "fine", "seized", "terminated", "disabled", "compromised", "hacked", "unauthorized",
    "illegal", "violation", "warning", "alert", "deactivate", "closed", "locked", "restricted",
    "banned", "blacklisted", "warrant", "jail",
    "block ho jayega", "band ho jayega", "suspend", "freeze",
    "ब्लॉक", "बंद", "कानूनी कार्रवाई", "पुलिस", "गिरफ्तार", "जुर्माना", "अवैध", "चेतावनी",
    "தடை", "நிறுத்தப்பட்டது", "சட்ட நடவடிக்கை", "காவல்துறை",
    "బ్లాక్", "నిలిపివేయబడింది", "చట్టపరమైన చర్య",
    "ನಿರ್ಬಂಧಿಸಲಾಗಿದೆ", "ಕಾನೂನು ಕ್ರಮ", "ബ്ലോക്ക്", "നിയമനടപടി",
    "ব্লক", "আইনি পদক্ষেপ", "कायदेशीर कारवाई",
];

static CREDENTIAL_KEYWORDS: &[&str] = &[
    "otp", "pin", "password", "cvv", "card number", "account number", "verify", "confirm",
    "update", "share", "send", "provide", "enter", "aadhaar", "pan", "bank details", "login",
    "credentials", "secret code", "verification code", "atm pin", "internet banking",
    "mobile banking", "net banking", "debit card", "credit card", "mpin", "upi pin",
    "otp bhejo", "otp batao", "otp dijiye", "pin batao", "password dijiye",
    "ओटीपी", "पिन", "पासवर्ड", "सत्यापित करें", "आधार", "पैन",
    "கடவுச்சொல்", "சரிபார்க்க", "ஆதார்", "పాస్‌వర్డ్", "ధృవీకరించండి", "ఆధార్",
    "ಪಾಸ್‌ವರ್ಡ್", "ಪರಿಶೀಲಿಸಿ", "പാസ്‌വേഡ്", "സ്ഥിരീകരിക്കുക",
    "পাসওয়ার্ড", "যাচাই করুন", "सत्यापित करा",
];

static MONEY_KEYWORDS: &[&str] = &[
    "transfer", "payment", "pay", "send money", "deposit", "fee", "charge", "cost", "rupees",
    "rs", "inr", "amount", "processing fee", "registration fee", "advance", "token amount",
    "security deposit",
    "paise bhejo", "paisa transfer", "pay karo", "bhej do",
    "भुगतान", "पैसे भेजो", "रुपये", "शुल्क", "फीस", "जमा",
    "பணம்", "செலுத்து", "கட்டணம்", "డబ్బు", "చెల్లించు", "ఫీజు",
    "ಹಣ", "ಪಾವತಿ", "ಶುಲ್ಕ", "പണം", "അടയ്ക്കുക", "ഫീസ്",
    "টাকা", "পাঠান", "ফি", "पैसे", "भरा",
];

static REWARD_KEYWORDS: &[&str] = &[
    "winner", "congratulations", "selected", "prize", "reward", "cashback", "refund", "bonus",
    "lottery", "lucky", "won", "claim", "free", "gift", "offer", "jackpot", "bumper",
    "lucky draw", "scratch card",
    "jeeta", "jeet gaye", "badhai ho", "muft", "inam",
    "जीत", "इनाम", "बधाई", "कैशबैक", "मुफ्त", "लॉटरी", "विजेता",
    "பரிசு", "வென்றீர்கள்", "வாழ்த்துக்கள்", "బహుమతి", "గెలిచారు", "అభినందనలు",
    "ಬಹುಮಾನ", "ಗೆದ್ದಿದ್ದೀರಿ", "സമ്മാനം", "വിജയിച്ചു",
    "পুরস্কার", "জিতেছেন", "बक्षीस", "जिंकलात",
];

static IMPERSONATION_KEYWORDS: &[&str] = &[
    "bank manager", "rbi", "reserve bank", "income tax", "customs", "cbi", "cyber cell",
    "customer care", "support team", "government", "official", "sbi", "hdfc", "icici", "axis",
    "paytm", "phonepe", "gpay", "amazon", "flipkart", "microsoft", "apple", "google",
    "facebook", "whatsapp", "telegram", "police", "officer", "inspector", "department",
    "ministry",
    "बैंक मैनेजर", "आयकर विभाग", "सरकारी", "पुलिस अधिकारी", "विभाग",
    "வங்கி மேலாளர்", "அரசு அதிகாரி", "బ్యాంక్ మేనేజర్", "ప్రభుత్వ అధికారి",
];

static KYC_KEYWORDS: &[&str] = &[
    "kyc", "know your customer", "verification required", "update kyc", "kyc expire",
    "document verification", "identity proof", "re-kyc", "video kyc", "ekyc", "kyc update",
    "kyc pending", "complete kyc",
    "kyc karo", "kyc update karo", "kyc expired",
    "केवाईसी", "दस्तावेज़ सत्यापन", "கேஒய்சி", "కెవైసి",
];

static TECH_KEYWORDS: &[&str] = &[
    "virus", "malware", "infected", "hacked", "compromised", "remote access", "teamviewer",
    "anydesk", "technical support", "microsoft support", "apple support", "computer problem",
    "antivirus", "firewall", "security alert",
];

static INVESTMENT_KEYWORDS: &[&str] = &[
    "guaranteed returns", "double money", "triple money", "100% profit", "daily profit",
    "weekly returns", "crypto", "bitcoin", "forex", "trading", "investment opportunity",
    "high returns", "low risk", "no risk", "assured returns", "fixed returns",
    "paisa double", "guaranteed profit", "daily kamai",
];

/// Phrases that demand an action from the recipient.
pub static DEMAND_PHRASES: &[&str] = &[
    "share your", "send your", "provide your", "enter your", "give your",
    "share the otp", "send the otp", "tell me your", "type your",
    "click here", "click below", "click the link", "call now", "call immediately",
    "pay now", "pay immediately", "transfer now", "deposit now",
    "install this", "download this", "install anydesk", "install teamviewer",
    "otp bhejo", "otp batao", "otp bhej do", "pin batao", "paise bhejo",
    "अपना otp भेजो", "otp बताओ", "पिन बताओ", "पैसे भेजो",
    "send otp", "share otp", "give otp", "tell otp", "otp send", "otp share",
    "send pin", "share pin", "give pin", "enter otp", "enter pin",
    "otp now", "pin now", "pay rs", "transfer rs", "send rs",
    "otp dedo", "otp de do", "pin dedo", "pin de do", "paisa bhej",
    "otp भेजो", "otp दो", "पिन भेजो", "पिन दो",
    "verification required", "immediate verification", "verify immediately",
    "kindly share", "kindly provide", "kindly verify", "please share",
    "contact our", "contact immediately", "call our", "reach out to",
    "failure to comply", "failure to verify", "non-cooperation",
    "within 24 hours", "within 2 hours", "within 30 minutes",
    "will be blocked", "will be suspended", "will be frozen", "will be terminated",
    "legal action will", "fir will", "case will be filed",
    "transfer to", "deposit to", "pay to",
    "तुरंत सत्यापित करें", "कृपया otp भेजें", "तुरंत भुगतान करें",
    "ब्लॉक कर दिया जाएगा", "कानूनी कार्रवाई होगी",
];

/// Patterns that mark a message as a legitimate notification.
pub static SAFE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)otp.*do\s*not\s*share",
        r"(?i)otp.*never\s*share",
        r"(?i)do\s*not\s*share.*otp",
        r"(?i)order.*(shipped|delivered|dispatched)",
        r"(?i)appointment.*(confirmed|scheduled|booked)",
        r"(?i)(thank|thanks).*for.*(order|payment|booking)",
        r"(?i)emi.*due\s*date",
        r"(?i)your\s*(ticket|booking).*confirmed",
        r"(?i)successfully\s*(registered|signed up)",
        r"(?i)(meeting|call)\s*(scheduled|at)\s*\d",
        r"(?i)otp\s*(is|:)\s*\d{4,8}.*do\s*not",
        r"(?i)(subscription|plan).*(renewed|activated|confirmed)",
        r"(?i)(payment|transaction).*(successful|received|completed)",
        r"(?i)(maturity|maturing|matures)\s*(on|date)",
        r"(?i)(delivery|delivered)\s*(by|on|before|tomorrow)",
        r"(?i)(balance|available).*(rs|₹|inr)\s*\d",
        r"(?i)(otp|code)\s*(is|:)\s*\d{4,8}",
        r"किसी.*साथ.*साझा\s*न\s*करें",
        r"किसी.*के.*साथ.*share\s*न",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("safe pattern regex"))
    .collect()
});

/// Domains whose presence lowers the suspicion score.
pub static LEGITIMACY_DOMAINS: &[&str] = &[
    "amazon.in", "amazon.com", "flipkart.com", "sbi.co.in", "hdfcbank.com",
    "icicibank.com", "axisbank.in", "paytm.com", "phonepe.com",
    "irctc.co.in", "gov.in", "rbi.org.in", "npci.org.in",
];

/// Flagged phone numbers (last ten digits).
pub static KNOWN_SCAM_PHONES: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    ["9876543210", "8888777766", "9999888877", "7777666655", "1800123456"]
        .into_iter()
        .collect()
});

/// Normalizes common leetspeak substitutions so obfuscated keywords match.
pub fn normalize_leet(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => 'i',
            '3' => 'e',
            '4' => 'a',
            '5' => 's',
            '7' => 't',
            '@' => 'a',
            '$' => 's',
            other => other,
        })
        .collect()
}

/// Category combinations that amplify the base score.
const COMBOS: &[(&[SignalCategory], f64)] = &[
    (
        &[SignalCategory::Urgency, SignalCategory::Threat, SignalCategory::CredentialRequest],
        1.6,
    ),
    (
        &[SignalCategory::Urgency, SignalCategory::Threat, SignalCategory::MoneyRequest],
        1.5,
    ),
    (&[SignalCategory::Reward, SignalCategory::MoneyRequest], 1.5),
    (&[SignalCategory::Impersonation, SignalCategory::CredentialRequest], 1.5),
    (&[SignalCategory::Impersonation, SignalCategory::Threat], 1.4),
    (&[SignalCategory::Urgency, SignalCategory::CredentialRequest], 1.3),
    (&[SignalCategory::Threat, SignalCategory::CredentialRequest], 1.4),
    (&[SignalCategory::Kyc, SignalCategory::Threat], 1.3),
    (&[SignalCategory::Kyc, SignalCategory::CredentialRequest], 1.3),
];

/// Computes the combo multiplier for the set of triggered categories.
///
/// A single triggered category dampens to 0.7; none zeroes the score.
pub fn combo_multiplier(active: &BTreeSet<SignalCategory>) -> f64 {
    let mut best = 1.0_f64;
    for (combo, mult) in COMBOS {
        if combo.iter().all(|c| active.contains(c)) {
            best = best.max(*mult);
        }
    }
    match active.len() {
        0 => 0.0,
        1 => 0.7,
        _ => best,
    }
}

/// Category regex patterns, checked in priority order. Each hit adds 0.25.
pub static CATEGORY_PATTERNS: Lazy<Vec<(ScamCategory, Vec<Regex>)>> = Lazy::new(|| {
    let compile = |pats: &[&str]| -> Vec<Regex> {
        pats.iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("category pattern regex"))
            .collect()
    };
    vec![
        (
            ScamCategory::BankingFraud,
            compile(&[
                r"(account|a/c).*(block|suspend|frozen|close|deactivat|lock)",
                r"(credit|debit)\s*card.*(block|expire|suspend|compromis)",
                r"(transaction|txn).*(fail|decline|suspicious|unauthori)",
                r"bank.*(call|contact|verify|update)",
                r"(atm|card).*(clone|hack|compromis)",
                r"(account|a/c).*(verify|update).*(immediately|urgent|now)",
            ]),
        ),
        (
            ScamCategory::UpiFraud,
            compile(&[
                r"upi.*(id|pin|verify|update|block|expire)",
                r"(payment|money).*(receive|collect|request|pending|fail)",
                r"(refund|cashback).*(process|claim|receive|credit)",
                r"(phonepe|paytm|gpay|bhim).*(verify|update|link|block)",
                r"upi\s*pin.*(share|enter|confirm|verify)",
            ]),
        ),
        (
            ScamCategory::KycFraud,
            compile(&[
                r"kyc.*(update|expire|pending|complete|verify|fail)",
                r"(document|identity).*(verify|upload|submit)",
                r"(aadhaar|pan|passport).*(link|verify|update|expire)",
                r"(wallet|account).*(suspend|block).*kyc",
                r"(re-?kyc|e-?kyc|video\s*kyc)",
            ]),
        ),
        (
            ScamCategory::Phishing,
            compile(&[
                r"click.*(link|here|below|button|url)",
                r"(download|install).*(app|software|apk)",
                r"(login|sign\s*in).*(secure|verify|confirm)",
                r"https?://[^\s]*\.(xyz|tk|ml|ga|cf|top|buzz|click|loan)",
                r"bit\.ly|tinyurl|shorturl",
            ]),
        ),
        (
            ScamCategory::LotteryScam,
            compile(&[
                r"(won|winner|selected).*(lottery|prize|lucky|draw|jackpot)",
                r"(claim|collect).*(prize|reward|winning|gift)",
                r"congratulations.*(selected|won|winner|lucky)",
            ]),
        ),
        (
            ScamCategory::Impersonation,
            compile(&[
                r"(rbi|reserve\s*bank|sebi|income\s*tax|customs|cbi|police|court)",
                r"(government|official|department).*(notice|order|letter|summon)",
                r"(customer\s*care|support|helpline).*(number|call)",
                r"this\s*is.*(officer|inspector|constable|ips|ias)",
                r"(arrest|warrant|fir|legal\s*action|prosecution|jail)",
                r"(cbi|police|court|cyber\s*cell).*(officer|inspector|case)",
                r"(money\s*laundering|fraud\s*case|criminal\s*case|investigation)",
                r"(safe\s*custody|rbi\s*account|government\s*account)",
            ]),
        ),
        (
            ScamCategory::InvestmentFraud,
            compile(&[
                r"(invest|trading).*(guaranteed|assured|double|triple|100%)",
                r"(crypto|bitcoin|forex).*(profit|return|gain)",
                r"(return|profit).*(100%|200%|daily|weekly|monthly)",
            ]),
        ),
        (
            ScamCategory::JobScam,
            compile(&[
                r"(job|work).*(home|online|part\s*time|remote)",
                r"(earn|income|salary).*(daily|weekly|monthly|lakh|thousand|50k)",
                r"(registration|joining).*(fee|charge|payment)",
            ]),
        ),
    ]
});

/// Keywords that force the Impersonation category when enough are present.
pub static IMPERSONATION_OVERRIDES: &[&str] = &[
    "cbi", "police", "officer", "inspector", "court", "arrest", "warrant", "legal action",
    "fir", "cyber cell", "customs", "income tax", "government", "department", "ministry",
    "ips", "ias", "constable",
];

/// Keywords that force the InvestmentFraud category.
pub static INVESTMENT_OVERRIDES: &[&str] = &[
    "guaranteed returns", "double money", "100% profit", "crypto", "bitcoin", "forex",
    "trading", "high returns", "daily profit",
];

/// Keywords that force the JobScam category.
pub static JOB_OVERRIDES: &[&str] = &[
    "work from home", "part time", "registration fee", "joining fee", "data entry",
    "online job", "earn daily",
];

/// Credential nouns used in the short-demand heuristic.
pub static CREDENTIAL_WORDS: &[&str] = &["otp", "pin", "password", "cvv", "aadhaar", "pan"];

/// Imperative verbs used in the short-demand heuristic.
pub static ACTION_VERBS: &[&str] = &[
    "send", "share", "give", "tell", "enter", "bhejo", "batao", "dedo", "dijiye",
];

/// TLD fragments that mark a bare link as suspicious.
pub static SUSPICIOUS_SHORT_TLDS: &[&str] = &[
    ".xyz", ".tk", ".ml", ".ga", ".cf", ".top", ".buzz", ".click", ".loan", ".win",
];

/// Likely follow-up actions per scam category.
pub fn predicted_moves(category: ScamCategory) -> &'static [&'static str] {
    match category {
        ScamCategory::BankingFraud => &[
            "Will ask for OTP or PIN",
            "Will create urgency about account closure",
            "Will ask for bank account number",
        ],
        ScamCategory::UpiFraud => &[
            "Will send collect request",
            "Will ask for UPI PIN",
            "Will claim refund pending",
        ],
        ScamCategory::KycFraud => &[
            "Will ask for Aadhaar/PAN",
            "Will send fake KYC link",
            "Will threaten account suspension",
        ],
        ScamCategory::Phishing => &[
            "Will send malicious link",
            "Will ask to enter credentials",
            "Will impersonate brand",
        ],
        ScamCategory::LotteryScam => &[
            "Will ask for processing fee",
            "Will request bank details",
            "Will ask for documents",
        ],
        ScamCategory::Impersonation => &[
            "Will threaten legal action",
            "Will demand immediate payment",
            "Will ask for documents",
        ],
        ScamCategory::InvestmentFraud => &[
            "Will show fake profit screenshots",
            "Will ask for investment",
            "Will promise returns",
        ],
        ScamCategory::JobScam => &[
            "Will ask for registration fee",
            "Will request documents",
            "Will promise salary",
        ],
        ScamCategory::TechSupport => &[
            "Will ask to install remote access",
            "Will show fake virus",
            "Will ask for payment",
        ],
        ScamCategory::RomanceScam => &[
            "Will build emotional connection",
            "Will ask for money",
            "Will avoid video calls",
        ],
        ScamCategory::Extortion => &[
            "Will threaten to release info",
            "Will demand payment",
            "Will set deadline",
        ],
        ScamCategory::Unknown => &[
            "Will try to establish trust",
            "Will ask for money or credentials",
            "Will create urgency",
        ],
    }
}
