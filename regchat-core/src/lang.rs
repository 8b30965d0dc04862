//! Interface language and translated UI strings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Interface language preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Arabic (default)
    #[default]
    Ar,
    /// English
    En,
}

impl Language {
    /// The other language
    pub fn toggled(self) -> Self {
        match self {
            Language::Ar => Language::En,
            Language::En => Language::Ar,
        }
    }

    /// Whether text in this language reads right-to-left
    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Ar)
    }

    /// UI strings for this language
    pub fn translation(self) -> &'static Translation {
        match self {
            Language::Ar => &AR,
            Language::En => &EN,
        }
    }
}

/// UI string table for one language
#[derive(Debug)]
pub struct Translation {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub welcome: &'static str,
    pub welcome_desc: &'static str,
    pub examples_title: &'static str,
    pub examples: [&'static str; 4],
    pub placeholder: &'static str,
    pub thinking: &'static str,
    pub error_message: &'static str,
    pub sources: &'static str,
    pub page: &'static str,
    pub lang_switch: &'static str,
    pub new_chat: &'static str,
    pub chat_history: &'static str,
    pub no_chats: &'static str,
    pub delete_chat: &'static str,
}

static AR: Translation = Translation {
    title: "روبوت الدردشة للوائح كلية الحاسبات والذكاء الاصطناعي",
    subtitle: "اسأل عن لوائح كلية الحاسبات والذكاء الاصطناعي - جامعة مدينة السادات",
    welcome: "مرحباً بك!",
    welcome_desc: "أنا مساعدك للإجابة عن أسئلتك حول لوائح كلية الحاسبات والذكاء الاصطناعي. اكتب سؤالك في الأسفل للبدء.",
    examples_title: "💡 أمثلة على الأسئلة:",
    examples: [
        "كم عدد الساعات المطلوبة للتخرج؟",
        "ما هي شروط الانسحاب من المقررات؟",
        "كيف يتم حساب المعدل التراكمي؟",
        "ما هي المقررات الاختيارية المتاحة؟",
    ],
    placeholder: "اكتب سؤالك هنا... (مثال: كم عدد الساعات المطلوبة للتخرج؟)",
    thinking: "جاري التفكير...",
    error_message: "عذراً، حدث خطأ أثناء معالجة طلبك. يرجى المحاولة مرة أخرى.",
    sources: "المصادر",
    page: "صفحة",
    lang_switch: "English",
    new_chat: "محادثة جديدة",
    chat_history: "سجل المحادثات",
    no_chats: "لا توجد محادثات سابقة",
    delete_chat: "حذف المحادثة",
};

static EN: Translation = Translation {
    title: "FCAI USC Regulations Chatbot",
    subtitle: "Ask about Faculty of Computers and AI regulations - University of Sadat City",
    welcome: "Welcome!",
    welcome_desc: "I'm your assistant to answer questions about the Faculty of Computers and Artificial Intelligence regulations. Type your question below to get started.",
    examples_title: "💡 Example questions:",
    examples: [
        "How many credit hours are required for graduation?",
        "What are the course withdrawal conditions?",
        "How is the GPA calculated?",
        "What are the available elective courses?",
    ],
    placeholder: "Type your question here... (e.g., How many hours are required for graduation?)",
    thinking: "Thinking...",
    error_message: "Sorry, an error occurred while processing your request. Please try again.",
    sources: "Sources",
    page: "Page",
    lang_switch: "العربية",
    new_chat: "New Chat",
    chat_history: "Chat History",
    no_chats: "No previous chats",
    delete_chat: "Delete chat",
};

/// Format a session timestamp relative to now, localized per language.
///
/// Recent timestamps render as today / yesterday / "N days ago"; older ones
/// fall back to a short date.
pub fn format_session_date(timestamp: DateTime<Utc>, lang: Language) -> String {
    let diff_days = (Utc::now() - timestamp).num_days();

    match lang {
        Language::Ar => {
            if diff_days <= 0 {
                "اليوم".to_string()
            } else if diff_days == 1 {
                "أمس".to_string()
            } else if diff_days < 7 {
                format!("منذ {} أيام", diff_days)
            } else {
                timestamp.format("%d/%m/%Y").to_string()
            }
        }
        Language::En => {
            if diff_days <= 0 {
                "Today".to_string()
            } else if diff_days == 1 {
                "Yesterday".to_string()
            } else if diff_days < 7 {
                format!("{} days ago", diff_days)
            } else {
                timestamp.format("%b %-d").to_string()
            }
        }
    }
}
