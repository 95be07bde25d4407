use pim_api::{App, Form, NoticeLevel, Outcome, Response, Route, View};
use pim_core::{Database, PassingYearRange};
use tempfile::TempDir;

fn app() -> (TempDir, App) {
    let dir = tempfile::tempdir().unwrap();
    let app = App::from_parts(
        Database::new(dir.path().join("people.db")),
        PassingYearRange::default(),
    );
    app.startup().unwrap();
    (dir, app)
}

fn person_form(name: &str, phone: &str, email: &str) -> Form {
    Form::new()
        .with("name", name)
        .with("dob", "1988-02-29")
        .with("gender", "male")
        .with("phone", phone)
        .with("email", email)
        .with("address", "22 River Lane")
}

fn career_form(person_id: i64, title: &str) -> Form {
    Form::new()
        .with("person_id", person_id.to_string())
        .with("job_title", title)
        .with("company", "Initech")
        .with("years_experience", "3")
        .with("skills", "rust")
}

fn education_form(person_id: i64, year: &str) -> Form {
    Form::new()
        .with("person_id", person_id.to_string())
        .with("degree", "BTech")
        .with("institution", "Tech Institute")
        .with("year_of_passing", year)
}

fn add_person(app: &App, name: &str, phone: &str) -> i64 {
    let email = format!("{}@example.com", name.to_lowercase());
    let response = app.add_person(&person_form(name, phone, &email));
    assert_eq!(response.notice_level(), Some(NoticeLevel::Success));
    match app.person_list(Some(name)).view() {
        Some(View::PersonList { persons, .. }) => persons[0].person_id,
        other => panic!("unexpected view: {other:?}"),
    }
}

fn person_list(response: &Response) -> (usize, &str, bool) {
    match response.view() {
        Some(View::PersonList {
            persons,
            query,
            is_empty,
        }) => (persons.len(), query.as_str(), *is_empty),
        other => panic!("unexpected view: {other:?}"),
    }
}

#[test]
fn empty_database_lists_no_persons() {
    let (_dir, app) = app();
    let response = app.person_list(None);
    assert_eq!(person_list(&response), (0, "", true));
    assert_eq!(response.notice, None);
}

#[test]
fn add_person_then_search_echoes_query() {
    let (_dir, app) = app();
    let response = app.add_person(&person_form("Farah", "+91 99887 76655", "farah@example.com"));
    assert_eq!(response.redirect_target(), Some(Route::PersonList));
    assert_eq!(response.notice_level(), Some(NoticeLevel::Success));

    let hit = app.person_list(Some(" 9988776655 "));
    assert_eq!(person_list(&hit), (1, "9988776655", false));

    let miss = app.person_list(Some("nobody"));
    assert_eq!(person_list(&miss), (0, "nobody", true));
}

#[test]
fn duplicate_phone_warns_and_returns_to_form() {
    let (_dir, app) = app();
    add_person(&app, "Gita", "9000000500");

    let response = app.add_person(&person_form("Hari", "09000000500", "hari@example.com"));
    assert_eq!(response.notice_level(), Some(NoticeLevel::Warning));
    assert_eq!(response.redirect_target(), Some(Route::AddPerson));
    assert!(response.notice.unwrap().message.contains("phone"));
    assert_eq!(person_list(&app.person_list(None)).0, 1);
}

#[test]
fn missing_form_field_is_a_warning() {
    let (_dir, app) = app();
    let form = Form::new()
        .with("name", "NoPhone")
        .with("email", "np@example.com");

    let response = app.add_person(&form);
    assert_eq!(response.notice_level(), Some(NoticeLevel::Warning));
    assert_eq!(response.redirect_target(), Some(Route::AddPerson));
}

#[test]
fn add_person_form_carries_current_date() {
    let (_dir, app) = app();
    match app.add_person_form().outcome {
        Outcome::Render(View::AddPersonForm { current_date }) => {
            assert_eq!(current_date, pim_core::model::validate::today());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn missing_or_non_positive_person_redirects_to_list() {
    let (_dir, app) = app();
    for id in [0, -1, 404] {
        let response = app.person_detail(id);
        assert_eq!(response.redirect_target(), Some(Route::PersonList));
        assert!(response.is_danger());
    }
    assert!(app.delete_person(404).is_danger());
}

#[test]
fn update_person_redirects_to_detail() {
    let (_dir, app) = app();
    let id = add_person(&app, "Ishaan", "9000000510");

    let form = Form::new()
        .with("gender", "male")
        .with("phone", "9000000511")
        .with("email", "ishaan@new.example")
        .with("address", "");
    let response = app.update_person(id, &form);
    assert_eq!(response.redirect_target(), Some(Route::PersonDetail(id)));
    assert_eq!(response.notice_level(), Some(NoticeLevel::Success));

    match app.edit_person_form(id).view() {
        Some(View::EditPersonForm { person }) => {
            assert_eq!(person.phone, "9000000511");
            assert_eq!(person.name, "Ishaan");
        }
        other => panic!("unexpected view: {other:?}"),
    }

    let bad = app.update_person(id, &form.clone().with("email", "nope"));
    assert_eq!(bad.redirect_target(), Some(Route::EditPerson(id)));
    assert_eq!(bad.notice_level(), Some(NoticeLevel::Warning));
}

#[test]
fn career_lifecycle_returns_to_owner() {
    let (_dir, app) = app();
    let owner = add_person(&app, "Jaya", "9000000520");

    let created = app.add_career(owner, &career_form(owner, "Developer"));
    assert_eq!(created.redirect_target(), Some(Route::PersonDetail(owner)));
    assert_eq!(created.notice_level(), Some(NoticeLevel::Success));

    let career_id = match app.career_list().view() {
        Some(View::CareerList { items }) => {
            assert_eq!(items[0].person_name, "Jaya");
            items[0].career_id
        }
        other => panic!("unexpected view: {other:?}"),
    };

    match app.edit_career_form(career_id).view() {
        Some(View::EditCareerForm { career, owners }) => {
            assert_eq!(career.job_title, "Developer");
            assert_eq!(owners.len(), 1);
        }
        other => panic!("unexpected view: {other:?}"),
    }

    let deleted = app.delete_career(career_id);
    assert_eq!(deleted.redirect_target(), Some(Route::PersonDetail(owner)));
    assert_eq!(deleted.notice_level(), Some(NoticeLevel::Success));
}

#[test]
fn identical_career_edit_returns_success_without_notice() {
    let (_dir, app) = app();
    let owner = add_person(&app, "Kabir", "9000000530");
    app.add_career(owner, &career_form(owner, "Tester"));
    let career_id = match app.career_list().view() {
        Some(View::CareerList { items }) => items[0].career_id,
        other => panic!("unexpected view: {other:?}"),
    };

    let response = app.update_career(career_id, &career_form(owner, "Tester"));
    assert_eq!(response.redirect_target(), Some(Route::CareerList));
    assert_eq!(response.notice, None);

    let changed = app.update_career(career_id, &career_form(owner, "QA Lead"));
    assert_eq!(changed.redirect_target(), Some(Route::CareerList));
    assert_eq!(changed.notice_level(), Some(NoticeLevel::Success));
}

#[test]
fn career_edit_to_missing_owner_stays_on_form() {
    let (_dir, app) = app();
    let owner = add_person(&app, "Lata", "9000000540");
    app.add_career(owner, &career_form(owner, "Nurse"));
    let career_id = match app.career_list().view() {
        Some(View::CareerList { items }) => items[0].career_id,
        other => panic!("unexpected view: {other:?}"),
    };

    let response = app.update_career(career_id, &career_form(999, "Nurse"));
    assert!(response.is_danger());
    assert_eq!(response.redirect_target(), Some(Route::EditCareer(career_id)));
}

#[test]
fn delete_nonexistent_career_redirects_to_list() {
    let (_dir, app) = app();
    let response = app.delete_career(12345);
    assert_eq!(response.redirect_target(), Some(Route::CareerList));
    assert!(response.is_danger());
}

#[test]
fn add_career_for_missing_person_redirects_to_person_list() {
    let (_dir, app) = app();
    assert_eq!(
        app.add_career_form(77).redirect_target(),
        Some(Route::PersonList)
    );
    let response = app.add_career(77, &career_form(77, "Ghost"));
    assert!(response.is_danger());
    assert_eq!(response.redirect_target(), Some(Route::PersonList));
}

#[test]
fn career_form_without_skills_field_returns_to_form() {
    let (_dir, app) = app();
    let owner = add_person(&app, "Meera", "9000000545");
    let form = Form::new()
        .with("person_id", owner.to_string())
        .with("job_title", "Analyst")
        .with("company", "Initech")
        .with("years_experience", "2");

    let response = app.add_career(owner, &form);
    assert_eq!(response.notice_level(), Some(NoticeLevel::Warning));
    assert_eq!(response.redirect_target(), Some(Route::AddCareer(owner)));
    match app.career_list().view() {
        Some(View::CareerList { items }) => assert!(items.is_empty()),
        other => panic!("unexpected view: {other:?}"),
    }

    let blank_skills = app.add_career(owner, &form.with("skills", ""));
    assert_eq!(blank_skills.notice_level(), Some(NoticeLevel::Success));
}

#[test]
fn education_year_out_of_range_warns() {
    let (_dir, app) = app();
    let owner = add_person(&app, "Mohan", "9000000550");

    match app.add_education_form(owner).view() {
        Some(View::AddEducationForm { max_year, .. }) => assert_eq!(*max_year, 2050),
        other => panic!("unexpected view: {other:?}"),
    }

    let response = app.add_education(owner, &education_form(owner, "2051"));
    assert_eq!(response.notice_level(), Some(NoticeLevel::Warning));
    assert_eq!(response.redirect_target(), Some(Route::AddEducation(owner)));

    let response = app.add_education(owner, &education_form(owner, "2019"));
    assert_eq!(response.redirect_target(), Some(Route::EducationList));
    assert_eq!(response.notice_level(), Some(NoticeLevel::Success));
}

#[test]
fn education_edit_and_delete() {
    let (_dir, app) = app();
    let owner = add_person(&app, "Nalini", "9000000560");
    app.add_education(owner, &education_form(owner, "2015"));
    let edu_id = match app.education_list().view() {
        Some(View::EducationList { items }) => items[0].edu_id,
        other => panic!("unexpected view: {other:?}"),
    };

    let unchanged = app.update_education(edu_id, &education_form(owner, "2015"));
    assert_eq!(unchanged.notice, None);
    let updated = app.update_education(edu_id, &education_form(owner, "2016"));
    assert_eq!(updated.notice_level(), Some(NoticeLevel::Success));

    let deleted = app.delete_education(edu_id);
    assert_eq!(deleted.redirect_target(), Some(Route::PersonDetail(owner)));
    let again = app.delete_education(edu_id);
    assert_eq!(again.redirect_target(), Some(Route::EducationList));
    assert!(again.is_danger());
}

#[test]
fn deleting_person_removes_history_from_detail_and_lists() {
    let (_dir, app) = app();
    let owner = add_person(&app, "Om", "9000000570");
    app.add_career(owner, &career_form(owner, "Chef"));
    app.add_career(owner, &career_form(owner, "Head Chef"));
    app.add_education(owner, &education_form(owner, "2010"));

    match app.person_detail(owner).view() {
        Some(View::PersonDetail { detail }) => {
            assert_eq!(detail.careers.len(), 2);
            assert_eq!(detail.education.len(), 1);
        }
        other => panic!("unexpected view: {other:?}"),
    }

    let response = app.delete_person(owner);
    assert_eq!(response.notice_level(), Some(NoticeLevel::Success));
    assert!(matches!(
        app.career_list().view(),
        Some(View::CareerList { items }) if items.is_empty()
    ));
    assert!(matches!(
        app.education_list().view(),
        Some(View::EducationList { items }) if items.is_empty()
    ));
    assert!(app.person_detail(owner).is_danger());
}

#[test]
fn unavailable_database_reports_danger_without_panicking() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::from_parts(
        Database::new(dir.path().join("never-created.db")),
        PassingYearRange::default(),
    );

    let response = app.person_list(Some("x"));
    assert!(response.is_danger());
    assert_eq!(person_list(&response), (0, "x", true));

    let response = app.add_person(&person_form("P", "9000000580", "p@example.com"));
    assert!(response.is_danger());
    assert_eq!(response.redirect_target(), Some(Route::PersonList));
    assert!(!dir.path().join("never-created.db").exists());
}

#[test]
fn responses_serialize_to_json() {
    let (_dir, app) = app();
    let json = serde_json::to_value(app.person_list(None)).unwrap();
    assert_eq!(json["outcome"]["kind"], "render");
    assert_eq!(json["outcome"]["target"]["view"], "person_list");
    assert_eq!(json["outcome"]["target"]["is_empty"], true);
}
