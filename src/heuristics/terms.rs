//! Fixed vocabularies used by the category filter and stack check.

/// Title phrases of non-technical roles. Any hit excludes the posting.
pub const NON_TECHNICAL_TITLE_TERMS: &[&str] = &[
    "sales",
    "account executive",
    "account manager",
    "business development",
    "marketing",
    "recruiter",
    "recruiting",
    "talent acquisition",
    "human resources",
    "hr",
    "customer service",
    "customer support",
    "nurse",
    "nursing",
    "physical therapist",
    "therapist",
    "physician",
    "pharmacist",
    "dental",
    "teacher",
    "tutor",
    "driver",
    "warehouse",
    "cashier",
    "retail",
    "accountant",
    "bookkeeper",
    "paralegal",
    "attorney",
    "lawyer",
    "copywriter",
    "receptionist",
    "chef",
    "cook",
    "electrician",
    "plumber",
    "mechanic",
    "security guard",
];

/// Title phrases of technical roles. A title must contain at least one.
pub const TECHNICAL_TITLE_TERMS: &[&str] = &[
    "engineer",
    "engineering",
    "developer",
    "programmer",
    "software",
    "devops",
    "devsecops",
    "sre",
    "site reliability",
    "architect",
    "data scientist",
    "data analyst",
    "machine learning",
    "ml",
    "ai",
    "backend",
    "back end",
    "frontend",
    "front end",
    "full stack",
    "fullstack",
    "qa",
    "test automation",
    "security",
    "infrastructure",
    "platform",
    "cloud",
    "database",
    "dba",
    "cto",
    "mobile",
    "ios",
    "android",
    "web",
];

/// Technology names that, when named in a title, the user must have claimed.
pub const STACK_TERMS: &[&str] = &[
    "php",
    "symfony",
    "laravel",
    "drupal",
    "wordpress",
    "magento",
    "ruby",
    "rails",
    "java",
    "kotlin",
    "scala",
    "c#",
    ".net",
    "golang",
    "python",
    "django",
    "flask",
    "react",
    "angular",
    "vue",
    "node.js",
    "nodejs",
    "typescript",
    "javascript",
    "rust",
    "c++",
    "swift",
    "elixir",
    "erlang",
    "haskell",
    "clojure",
    "perl",
    "cobol",
    "salesforce",
    "sap",
    "flutter",
    "dart",
    "unity",
];

/// Normalized spellings that name the same stack.
pub const STACK_ALIASES: &[(&str, &str)] = &[
    ("golang", "go"),
    ("nodejs", "node"),
    ("javascript", "js"),
    ("typescript", "ts"),
    ("rails", "ror"),
];

/// Title words too common to signal alignment on their own.
pub const GENERIC_TITLE_WORDS: &[&str] = &[
    "senior", "sr", "junior", "jr", "mid", "lead", "staff", "principal", "head", "chief",
    "intern", "associate", "engineer", "engineering", "developer", "manager", "specialist",
    "consultant", "of", "and", "the", "for", "in", "at", "i", "ii", "iii", "iv", "remote",
    "hybrid", "onsite", "full", "part", "time", "contract", "level", "team", "m", "f", "d",
    "w",
];
