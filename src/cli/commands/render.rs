use crate::models::{MovieSummary, SearchCountRecord};

pub fn print_movies(movies: &[MovieSummary]) {
    if movies.is_empty() {
        println!("No movies found.");
        return;
    }

    println!("{:-<60}", "");
    for movie in movies {
        let year = movie.release_year().unwrap_or("N/A");
        let language = if movie.original_language.is_empty() {
            "??"
        } else {
            movie.original_language.as_str()
        };
        println!(
            "• {} ({}) ★ {:.1} | {} | ID: {}",
            movie.title, year, movie.vote_average, language, movie.id
        );
    }
    println!("{:-<60}", "");
}

pub fn print_trending(records: &[SearchCountRecord]) {
    if records.is_empty() {
        return;
    }

    println!("Trending:");
    for (i, record) in records.iter().enumerate() {
        println!(
            "  {}. {} ({} searches)",
            i + 1,
            record.search_term,
            record.count
        );
    }
    println!();
}
