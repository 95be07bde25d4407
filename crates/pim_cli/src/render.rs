//! Plain-text rendering of responses.

use pim_api::{Outcome, Response, View};
use pim_core::{Person, PersonSummary};
use std::fmt::{self, Write};

/// Renders the notice line followed by the view or redirect target.
pub fn render_text(response: &Response) -> String {
    let mut out = String::new();
    match write_text(&mut out, response) {
        Ok(()) => out,
        // `String` never reports a write failure.
        Err(fmt::Error) => String::new(),
    }
}

/// Writes the text rendering of `response` into `out`.
pub fn write_text(out: &mut impl Write, response: &Response) -> fmt::Result {
    if let Some(notice) = &response.notice {
        writeln!(out, "[{}] {}", notice.level, notice.message)?;
    }
    match &response.outcome {
        Outcome::Redirect(route) => writeln!(out, "-> {route}"),
        Outcome::Render(view) => render_view(out, view),
    }
}

fn render_view(out: &mut impl Write, view: &View) -> fmt::Result {
    match view {
        View::PersonList {
            persons,
            query,
            is_empty,
        } => {
            if *is_empty {
                let message = if query.is_empty() {
                    "No persons yet.".to_string()
                } else {
                    format!("No persons match `{query}`.")
                };
                return writeln!(out, "{message}");
            }
            for person in persons {
                writeln!(out, "{}", person_row(person))?;
            }
        }
        View::PersonDetail { detail } => {
            let person = &detail.person;
            writeln!(out, "{}", person_row(person))?;
            let dob = person
                .dob
                .map(|dob| dob.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(out, "  dob: {dob}  gender: {}", dash(&person.gender))?;
            writeln!(out, "  address: {}", dash(&person.address))?;
            writeln!(out, "career:")?;
            for career in &detail.careers {
                writeln!(
                    out,
                    "  #{} {} at {} ({} yrs) {}",
                    career.career_id,
                    career.job_title,
                    career.company,
                    career.years_experience,
                    career.skills
                )?;
            }
            writeln!(out, "education:")?;
            for education in &detail.education {
                writeln!(
                    out,
                    "  #{} {}, {} ({})",
                    education.edu_id,
                    education.degree,
                    education.institution,
                    education.year_of_passing
                )?;
            }
        }
        View::AddPersonForm { current_date } => {
            writeln!(out, "new person; dob must not be after {current_date}")?;
        }
        View::EditPersonForm { person } => {
            writeln!(out, "{}", person_row(person))?;
        }
        View::CareerList { items } => {
            for item in items {
                writeln!(
                    out,
                    "#{} {}: {} at {} ({} yrs) {}",
                    item.career_id,
                    item.person_name,
                    item.job_title,
                    item.company,
                    item.years_experience,
                    item.skills
                )?;
            }
        }
        View::AddCareerForm { person } => {
            writeln!(out, "new career for {}", owner(person))?;
        }
        View::EditCareerForm { career, owners } => {
            writeln!(
                out,
                "#{} person_id={} {} at {} ({} yrs) {}",
                career.career_id,
                career.person_id,
                career.job_title,
                career.company,
                career.years_experience,
                career.skills
            )?;
            render_owners(out, owners)?;
        }
        View::EducationList { items } => {
            for item in items {
                writeln!(
                    out,
                    "#{} {}: {}, {} ({})",
                    item.edu_id,
                    item.person_name,
                    item.degree,
                    item.institution,
                    item.year_of_passing
                )?;
            }
        }
        View::AddEducationForm {
            person,
            min_year,
            max_year,
        } => {
            writeln!(
                out,
                "new education for {}; year {min_year}..={max_year}",
                owner(person)
            )?;
        }
        View::EditEducationForm {
            education,
            owners,
            min_year,
            max_year,
        } => {
            writeln!(
                out,
                "#{} person_id={} {}, {} ({}); year {min_year}..={max_year}",
                education.edu_id,
                education.person_id,
                education.degree,
                education.institution,
                education.year_of_passing
            )?;
            render_owners(out, owners)?;
        }
    }
    Ok(())
}

fn render_owners(out: &mut impl Write, owners: &[PersonSummary]) -> fmt::Result {
    writeln!(out, "owners:")?;
    for summary in owners {
        writeln!(out, "  {}", owner(summary))?;
    }
    Ok(())
}

fn person_row(person: &Person) -> String {
    format!(
        "#{} {} | {} | {}",
        person.person_id, person.name, person.phone, person.email
    )
}

fn owner(summary: &PersonSummary) -> String {
    format!("#{} {}", summary.person_id, summary.name)
}

fn dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::{render_text, write_text};
    use pim_api::{Notice, Response, Route, View};
    use std::fmt;

    struct FailingWriter;

    impl fmt::Write for FailingWriter {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn redirect_prints_notice_and_target() {
        let response =
            Response::redirect(Route::PersonDetail(3)).with_notice(Notice::success("saved"));
        assert_eq!(render_text(&response), "[success] saved\n-> /person/3\n");
    }

    #[test]
    fn empty_search_names_the_query() {
        let response = Response::render(View::PersonList {
            persons: Vec::new(),
            query: "zed".to_string(),
            is_empty: true,
        });
        assert_eq!(render_text(&response), "No persons match `zed`.\n");
    }

    #[test]
    fn write_failures_reach_the_caller() {
        let response = Response::redirect(Route::PersonList).with_notice(Notice::success("saved"));
        assert_eq!(write_text(&mut FailingWriter, &response), Err(fmt::Error));

        let listing = Response::render(View::PersonList {
            persons: Vec::new(),
            query: String::new(),
            is_empty: true,
        });
        assert!(write_text(&mut FailingWriter, &listing).is_err());
    }
}
