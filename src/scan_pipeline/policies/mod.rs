mod terminal_vocabulary;

pub use terminal_vocabulary::TerminalVocabulary;
