//! Fixed word lists driving categorization, sentiment scoring, and review
//! word-frequency filtering. Table order matters for categorization: the
//! first category with a matching keyword wins.

pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Location Trackers", &["airtag"]),
    (
        "Audio Accessories",
        &[
            "airpods", "earbuds", "headphones", "jbl", "soundcore", "tozo", "trausi", "beribes",
            "pocbuds", "kurdene", "beats",
        ],
    ),
    ("Streaming Devices", &["fire tv stick", "roku"]),
    (
        "Power & Connectivity",
        &[
            "power strip",
            "surge protector",
            "charger",
            "usb c hub",
            "wall charger",
            "extension cord",
            "adapter",
        ],
    ),
    ("Smart Home Devices", &["echo", "smart plug", "alexa"]),
    ("Tablets", &["ipad", "tablet"]),
    ("E-readers", &["kindle"]),
    (
        "TV Mounts",
        &["tv wall mount", "mounting dream", "pipishell", "amazon basics full motion"],
    ),
    (
        "Cameras & Security",
        &["camera", "blink outdoor", "dash cam", "ring battery doorbell"],
    ),
    ("Remotes", &["remote control", "remote for roku", "remote for samsung"]),
    ("Televisions", &["vizio", "insignia", "tv", "smart tv"]),
    ("Cable Management", &["zip ties", "cable ties"]),
    ("Optics", &["binoculars"]),
];

pub const POSITIVE_KEYWORDS: &[&str] = &[
    "great", "amazing", "love", "excellent", "fantastic", "impressed", "seamless", "convenient",
    "happy", "good", "perfect", "reliable", "worth", "smooth", "crisp", "clear", "best", "easy",
    "strong", "solid", "recommend",
];

pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "issue", "problem", "flaw", "slow", "disappointed", "lag", "uncomfortable", "struggle",
    "annoying", "drain", "muffled", "distortion", "overheating", "buggy", "weak", "hard", "stuck",
    "difficult", "noise", "bad",
];

/// Standard English stopword list.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Review-specific noise words layered on top of the standard list.
pub const CUSTOM_STOPWORDS: &[&str] = &[
    "product", "item", "use", "using", "buy", "bought", "amazon", "day", "days", "months", "year",
    "years", "get", "like", "just", "even", "amp", "really", "much", "one", "can", "see", "think",
    "also", "way", "need", "time", "back", "etc", "etc.", "got", "did", "my", "your", "they",
    "we", "us", "i", "it", "so",
];
