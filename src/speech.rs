use rand::seq::SliceRandom;

/// Join names the way they are read aloud: `a, b and c`.
///
/// ```
/// use premium_facts::speech::join_for_speech;
/// assert_eq!(join_for_speech(&["Science Pack"]), "Science Pack");
/// assert_eq!(join_for_speech(&["A", "B", "C"]), "A, B and C");
/// ```
pub fn join_for_speech<S: AsRef<str>>(names: &[S]) -> String {
    join_with(names, "and")
}

/// Same as [`join_for_speech`] but offering a choice: `a, b or c`.
pub fn join_alternatives<S: AsRef<str>>(names: &[S]) -> String {
    join_with(names, "or")
}

fn join_with<S: AsRef<str>>(names: &[S], connector: &str) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{} {connector} {}", head.join(", "), last.as_ref())
        }
    }
}

/// Pools of interchangeable phrases.
#[derive(Debug, Clone)]
pub struct Phrasebook {
    pub yes_no_questions: Vec<String>,
    pub goodbyes: Vec<String>,
}

impl Default for Phrasebook {
    fn default() -> Self {
        Self {
            yes_no_questions: vec![
                "Would you like another fact?".into(),
                "Can I tell you another fact?".into(),
                "Do you want to hear another fact?".into(),
            ],
            goodbyes: vec![
                "OK.  Goodbye!".into(),
                "Have a great day!".into(),
                "Come back again soon!".into(),
            ],
        }
    }
}

impl Phrasebook {
    pub fn yes_no_question(&self) -> &str {
        pick(&self.yes_no_questions, "Would you like another fact?")
    }

    pub fn goodbye(&self) -> &str {
        pick(&self.goodbyes, "Goodbye!")
    }
}

fn pick<'a>(pool: &'a [String], default: &'a str) -> &'a str {
    pool.choose(&mut rand::thread_rng())
        .map(String::as_str)
        .unwrap_or(default)
}
