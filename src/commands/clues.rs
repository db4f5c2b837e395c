use rusqlite::Connection;

use crate::commands::db::{find_anagrams, find_ciphers, find_cryptics};
use crate::error::HighscoreError;
use crate::models::clue::{ClueMatches, ClueSolution, CrypticSolution};

fn classify<T>(mut results: Vec<T>, name: impl Fn(&T) -> String) -> ClueMatches<T> {
    match results.len() {
        0 => ClueMatches::None,
        1 => match results.pop() {
            Some(only) => ClueMatches::One(only),
            None => ClueMatches::None,
        },
        _ => ClueMatches::Many(results.iter().map(name).collect()),
    }
}

fn solution_reply(clue: &ClueSolution) -> String {
    let mut lines = vec![
        format!("Solution: {}", clue.solution),
        format!("Location: {}", clue.location),
    ];
    if let Some(answer) = &clue.challenge_answer {
        lines.push(format!("Challenge answer: {answer}"));
    }
    if let Some(puzzle) = &clue.puzzle {
        lines.push(puzzle.clone());
    }
    lines.join("\n")
}

fn clue_reply(results: Vec<ClueSolution>, kind: &str, max_matches: usize) -> String {
    match classify(results, |clue| clue.clue.clone()) {
        ClueMatches::None => format!("Could not find any {kind} with your search."),
        ClueMatches::One(clue) => solution_reply(&clue),
        ClueMatches::Many(names) if names.len() > max_matches => format!(
            "Found {} {kind}. To prevent too long messages only max. {max_matches} or less \
             partial matches are shown. Try to give a more accurate search term.",
            names.len()
        ),
        ClueMatches::Many(names) => format!("Found {} {kind}:\n{}", names.len(), names.join("\n")),
    }
}

pub fn anagram_command(
    conn: &Connection,
    search: &str,
    max_matches: usize,
) -> Result<String, HighscoreError> {
    let results = find_anagrams(conn, search.trim())?;
    Ok(clue_reply(results, "anagrams", max_matches))
}

pub fn cipher_command(
    conn: &Connection,
    search: &str,
    max_matches: usize,
) -> Result<String, HighscoreError> {
    let results = find_ciphers(conn, search.trim())?;
    Ok(clue_reply(results, "ciphers", max_matches))
}

/// Cryptic clues are long sentences, so only a single hit is ever listed.
pub fn cryptic_command(conn: &Connection, search: &str) -> Result<String, HighscoreError> {
    let results = find_cryptics(conn, search.trim())?;
    let reply = match classify(results, |cryptic: &CrypticSolution| cryptic.cryptic.clone()) {
        ClueMatches::None => "Could not find any cryptic clues with your search.".to_string(),
        ClueMatches::One(CrypticSolution {
            solution,
            image: Some(image),
            ..
        }) => format!("{solution}\n{image}"),
        ClueMatches::One(cryptic) => cryptic.solution,
        ClueMatches::Many(names) => format!(
            "Found {} cryptic clues with your search. Try to give a more accurate search term.",
            names.len()
        ),
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::db::{initialize_schema, insert_clue_solution, insert_cryptic, ClueTable};

    fn seeded_db() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");

        for (clue, puzzle) in [("Aha Jar", None), ("A Heart", Some("Light box"))] {
            insert_clue_solution(
                &conn,
                ClueTable::Anagrams,
                &ClueSolution {
                    clue: clue.to_string(),
                    solution: format!("{clue} npc"),
                    location: "Varrock".to_string(),
                    challenge_answer: Some("9".to_string()),
                    puzzle: puzzle.map(str::to_string),
                },
            )
            .expect("insert anagram");
        }
        insert_cryptic(
            &conn,
            &CrypticSolution {
                cryptic: "Search the crates in a bank".to_string(),
                solution: "Crates in Varrock west bank".to_string(),
                image: None,
            },
        )
        .expect("insert cryptic");
        conn
    }

    #[test]
    fn single_anagram_match_shows_full_solution() {
        let conn = seeded_db();
        let reply = anagram_command(&conn, "a heart", 15).expect("anagram");
        assert_eq!(
            reply,
            "Solution: A Heart npc\nLocation: Varrock\nChallenge answer: 9\nLight box"
        );
    }

    #[test]
    fn prefix_matches_are_listed_or_refused_when_too_many() {
        let conn = seeded_db();
        assert_eq!(
            anagram_command(&conn, "A", 15).expect("anagram"),
            "Found 2 anagrams:\nA Heart\nAha Jar"
        );
        assert!(anagram_command(&conn, "A", 1)
            .expect("anagram")
            .contains("Try to give a more accurate search term."));
        assert_eq!(
            cipher_command(&conn, "A", 15).expect("cipher"),
            "Could not find any ciphers with your search."
        );
    }

    #[test]
    fn cryptic_without_image_replies_with_solution_only() {
        let conn = seeded_db();
        assert_eq!(
            cryptic_command(&conn, "search the").expect("cryptic"),
            "Crates in Varrock west bank"
        );
    }
}
