//! Text normalization and tokenization used by the analytics engine

use std::collections::HashSet;
use std::sync::OnceLock;

/// Turns free text into comparable word tokens.
pub trait Tokenizer: Send + Sync {
    /// Lowercase the text and drop everything that is neither a word character nor whitespace.
    fn normalize(&self, text: &str) -> String;

    /// Split already normalized text into tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;

    fn is_stopword(&self, token: &str) -> bool;

    /// Normalized tokens with stopwords and single-character tokens removed.
    fn words(&self, text: &str) -> Vec<String> {
        self.tokenize(&self.normalize(text))
            .into_iter()
            .filter(|token| token.chars().count() > 1 && !self.is_stopword(token))
            .collect()
    }
}

/// English stopwords
static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn get_stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(|| {
        [
            "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've", "you'll",
            "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she", "she's",
            "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them", "their", "theirs",
            "themselves", "what", "which", "who", "whom", "this", "that", "that'll", "these", "those", "am", "is",
            "are", "was", "were", "be", "been", "being", "have", "has", "had", "having", "do", "does", "did",
            "doing", "a", "an", "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at",
            "by", "for", "with", "about", "against", "between", "into", "through", "during", "before", "after",
            "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
            "further", "then", "once", "here", "there", "when", "where", "why", "how", "all", "any", "both",
            "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same",
            "so", "than", "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've",
            "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
            "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't",
            "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
            "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
        ]
        .iter()
        .copied()
        .collect()
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishTokenizer;

impl Tokenizer for EnglishTokenizer {
    fn normalize(&self, text: &str) -> String {
        text.to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
            .collect()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    fn is_stopword(&self, token: &str) -> bool {
        get_stop_words().contains(token)
    }
}

/// Raw whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
