//! HTML page rendering.
//!
//! Pages are assembled from plain strings; every interpolated value passes
//! through [`escape_html`]. Handlers wrap the result with [`html`] or send a
//! [`redirect`] instead.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use pagination::query_with_page;

use crate::domain::{
    Error, MONTH_LABELS, PAGE_SIZE_OPTIONS, Student, StudentField, StudentListing,
    StudentPayload, StudentValidationErrors,
};
use crate::inbound::http::session::{Flash, SessionContext};

const PERIOD_LABELS: [&str; 3] = ["January - April", "May - August", "September - December"];

/// Per-request page furniture: queued flashes and the navigation state.
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    /// Flashes consumed for this render.
    pub flashes: Vec<Flash>,
    /// Whether the navigation shows account actions.
    pub authenticated: bool,
}

impl Chrome {
    /// Drain the session's flashes and read its sign-in state.
    pub fn consume(session: &SessionContext) -> Result<Self, Error> {
        Ok(Self {
            flashes: session.take_flashes()?,
            authenticated: session.is_authenticated()?,
        })
    }
}

/// Escape text for use in element content and quoted attributes.
///
/// # Examples
/// ```
/// use registry::inbound::http::pages::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">"), "&lt;a href=&quot;x&quot;&gt;");
/// ```
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// `200 OK` with an HTML body.
pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// `302 Found` pointing at `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

/// Input hint shown in an empty student form field.
pub fn placeholder(field: StudentField) -> &'static str {
    match field {
        StudentField::FirstName => "Enter first name",
        StudentField::LastName => "Enter last name",
        StudentField::Email => "Enter email",
        StudentField::DateOfBirth | StudentField::EnrollmentDate => "YYYY-MM-DD",
        StudentField::Grade => "Enter grade (1-12)",
    }
}

fn input_type(field: StudentField) -> &'static str {
    match field {
        StudentField::Email => "email",
        StudentField::Grade => "number",
        _ => "text",
    }
}

fn navigation(authenticated: bool) -> String {
    let account_links = if authenticated {
        concat!(
            "<a href=\"/student/new/\">Add student</a>",
            "<form method=\"post\" action=\"/logout/\" class=\"inline\">",
            "<button type=\"submit\">Logout</button></form>"
        )
    } else {
        "<a href=\"/login/\">Login</a><a href=\"/register/\">Register</a>"
    };
    format!("<nav><a href=\"/\">Students</a>{account_links}</nav>")
}

fn flash_list(flashes: &[Flash]) -> String {
    if flashes.is_empty() {
        return String::new();
    }
    let items: String = flashes
        .iter()
        .map(|flash| {
            format!(
                "<li class=\"{}\">{}</li>",
                flash.level.as_str(),
                escape_html(&flash.message)
            )
        })
        .collect();
    format!("<ul class=\"messages\">{items}</ul>")
}

fn layout(title: &str, chrome: &Chrome, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">",
            "<title>{title} | Student Registry</title></head><body>",
            "{nav}{flashes}<main><h1>{title}</h1>{body}</main></body></html>"
        ),
        title = escape_html(title),
        nav = navigation(chrome.authenticated),
        flashes = flash_list(&chrome.flashes),
        body = body,
    )
}

fn error_items(messages: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    let items: String = messages
        .into_iter()
        .map(|message| format!("<li>{}</li>", escape_html(message.as_ref())))
        .collect();
    if items.is_empty() {
        items
    } else {
        format!("<ul class=\"errorlist\">{items}</ul>")
    }
}

fn listing_filters(listing: &StudentListing) -> String {
    let request = &listing.request;
    let years: String = listing
        .available_years
        .iter()
        .map(|year| {
            let selected = if request.year() == Some(*year) {
                " selected"
            } else {
                ""
            };
            format!("<option value=\"{year}\"{selected}>{year}</option>")
        })
        .collect();
    let sizes: String = PAGE_SIZE_OPTIONS
        .iter()
        .map(|size| {
            let selected = if request.page_size().get() == *size {
                " selected"
            } else {
                ""
            };
            format!("<option value=\"{size}\"{selected}>{size}</option>")
        })
        .collect();
    format!(
        concat!(
            "<form method=\"get\" action=\"/\" class=\"filters\">",
            "<input type=\"search\" name=\"q\" value=\"{q}\" placeholder=\"Search by name\">",
            "<select name=\"selected_year\"><option value=\"\">All Years</option>{years}</select>",
            "<select name=\"records_per_page\">{sizes}</select>",
            "<button type=\"submit\">Filter</button></form>"
        ),
        q = escape_html(request.search()),
        years = years,
        sizes = sizes,
    )
}

fn student_rows(students: &[Student]) -> String {
    if students.is_empty() {
        return "<p class=\"empty\">No students found.</p>".to_owned();
    }
    let rows: String = students
        .iter()
        .map(|student| {
            format!(
                concat!(
                    "<tr><td><a href=\"/student/{id}/\">{name}</a></td>",
                    "<td>{email}</td><td>{enrolled}</td><td>{grade}</td></tr>"
                ),
                id = student.id(),
                name = escape_html(&student.full_name()),
                email = escape_html(student.email().as_str()),
                enrolled = student.enrollment_date(),
                grade = student.grade(),
            )
        })
        .collect();
    format!(
        concat!(
            "<table><thead><tr><th>Name</th><th>Email</th>",
            "<th>Enrollment date</th><th>Grade</th></tr></thead>",
            "<tbody>{rows}</tbody></table>"
        ),
        rows = rows
    )
}

fn pager(listing: &StudentListing, query: &str) -> String {
    let window = listing.page.window();
    let link = |label: &str, page: usize| {
        format!(
            "<a href=\"{}\">{label}</a>",
            escape_html(&query_with_page(query, page))
        )
    };
    let mut parts = Vec::new();
    if let Some(previous) = window.previous_page_number() {
        parts.push(link("&laquo; first", 1));
        parts.push(link("previous", previous));
    }
    parts.push(format!(
        "<span class=\"current\">Page {} of {}</span>",
        window.number(),
        window.num_pages()
    ));
    if let Some(next) = window.next_page_number() {
        parts.push(link("next", next));
        parts.push(link("last &raquo;", window.num_pages()));
    }
    let summary = if window.count() == 0 {
        String::new()
    } else {
        format!(
            "<p class=\"summary\">Showing {} to {} of {} students</p>",
            window.start_index(),
            window.end_index(),
            window.count()
        )
    };
    format!("{summary}<div class=\"pagination\">{}</div>", parts.concat())
}

/// Chart payload as a JSON script block; `<` is escaped so the data cannot
/// close the element early.
fn analytics_panel(listing: &StudentListing) -> String {
    let analytics = &listing.analytics;
    let periods: String = PERIOD_LABELS
        .iter()
        .zip(analytics.period_counts())
        .map(|(label, count)| format!("<li>{label}: {count}</li>"))
        .collect();
    let months: String = MONTH_LABELS
        .iter()
        .zip(analytics.monthly_counts())
        .map(|(label, count)| format!("<tr><td>{label}</td><td>{count}</td></tr>"))
        .collect();
    let payload = analytics.chart_payload().to_string().replace('<', "\\u003c");
    format!(
        concat!(
            "<section class=\"analytics\"><h2>Enrollment analytics</h2>",
            "<ul class=\"periods\">{periods}</ul>",
            "<table class=\"monthly\">{months}</table>",
            "<script id=\"enrollment-data\" type=\"application/json\">{payload}</script>",
            "</section>"
        ),
        periods = periods,
        months = months,
        payload = payload,
    )
}

/// List view with filters, results, pagination and analytics.
///
/// `query` is the raw request query string; page links keep every other
/// parameter intact.
pub fn student_list(listing: &StudentListing, query: &str, chrome: &Chrome) -> String {
    let body = [
        listing_filters(listing),
        student_rows(listing.page.items()),
        pager(listing, query),
        analytics_panel(listing),
    ]
    .concat();
    layout("Students", chrome, &body)
}

fn student_facts(student: &Student) -> String {
    format!(
        concat!(
            "<dl class=\"student\">",
            "<dt>First name</dt><dd>{first}</dd>",
            "<dt>Last name</dt><dd>{last}</dd>",
            "<dt>Email</dt><dd>{email}</dd>",
            "<dt>Date of birth</dt><dd>{born}</dd>",
            "<dt>Enrollment date</dt><dd>{enrolled}</dd>",
            "<dt>Grade</dt><dd>{grade}</dd>",
            "</dl>"
        ),
        first = escape_html(student.first_name().as_str()),
        last = escape_html(student.last_name().as_str()),
        email = escape_html(student.email().as_str()),
        born = student.date_of_birth(),
        enrolled = student.enrollment_date(),
        grade = student.grade(),
    )
}

/// Detail view of one record.
pub fn student_detail(student: &Student, chrome: &Chrome) -> String {
    let actions = if chrome.authenticated {
        format!(
            concat!(
                "<p class=\"actions\"><a href=\"/student/{id}/edit/\">Edit</a> ",
                "<a href=\"/student/{id}/delete/\">Delete</a></p>"
            ),
            id = student.id()
        )
    } else {
        String::new()
    };
    let body = format!(
        "{}{actions}<p><a href=\"/\">Back to list</a></p>",
        student_facts(student)
    );
    layout(&student.full_name(), chrome, &body)
}

/// Delete confirmation for one record.
pub fn delete_confirmation(student: &Student, chrome: &Chrome) -> String {
    let body = format!(
        concat!(
            "{facts}<p>Are you sure you want to delete {name}?</p>",
            "<form method=\"post\" action=\"/student/{id}/delete/\">",
            "<button type=\"submit\">Delete</button> ",
            "<a href=\"/student/{id}/\">Cancel</a></form>"
        ),
        facts = student_facts(student),
        name = escape_html(&student.full_name()),
        id = student.id(),
    );
    layout("Delete student", chrome, &body)
}

/// Create or edit form, echoing submitted values and field errors.
pub fn student_form(
    heading: &str,
    action: &str,
    payload: &StudentPayload,
    errors: Option<&StudentValidationErrors>,
    chrome: &Chrome,
) -> String {
    let fields: String = StudentField::ALL
        .iter()
        .map(|&field| {
            let messages = errors
                .map(|errors| {
                    error_items(errors.for_field(field).map(|error| error.message()))
                })
                .unwrap_or_default();
            format!(
                concat!(
                    "<p><label for=\"id_{name}\">{label}</label>",
                    "<input type=\"{kind}\" id=\"id_{name}\" name=\"{name}\" ",
                    "value=\"{value}\" placeholder=\"{hint}\">{messages}</p>"
                ),
                name = field.as_str(),
                label = field.label(),
                kind = input_type(field),
                value = escape_html(payload.value(field).unwrap_or_default()),
                hint = placeholder(field),
                messages = messages,
            )
        })
        .collect();
    let body = format!(
        concat!(
            "<form method=\"post\" action=\"{action}\">{fields}",
            "<button type=\"submit\">Save</button></form>"
        ),
        action = escape_html(action),
        fields = fields,
    );
    layout(heading, chrome, &body)
}

/// Registration form.
pub fn register_form(username: &str, errors: &[String], chrome: &Chrome) -> String {
    let body = format!(
        concat!(
            "{errors}<form method=\"post\" action=\"/register/\">",
            "<p><label for=\"id_username\">Username</label>",
            "<input type=\"text\" id=\"id_username\" name=\"username\" value=\"{username}\" maxlength=\"150\"></p>",
            "<p><label for=\"id_password1\">Password</label>",
            "<input type=\"password\" id=\"id_password1\" name=\"password1\"></p>",
            "<p><label for=\"id_password2\">Password confirmation</label>",
            "<input type=\"password\" id=\"id_password2\" name=\"password2\"></p>",
            "<button type=\"submit\">Register</button></form>",
            "<p>Already registered? <a href=\"/login/\">Log in</a></p>"
        ),
        errors = error_items(errors),
        username = escape_html(username),
    );
    layout("Register", chrome, &body)
}

/// Login form.
pub fn login_form(username: &str, chrome: &Chrome) -> String {
    let body = format!(
        concat!(
            "<form method=\"post\" action=\"/login/\">",
            "<p><label for=\"id_username\">Username</label>",
            "<input type=\"text\" id=\"id_username\" name=\"username\" value=\"{username}\"></p>",
            "<p><label for=\"id_password\">Password</label>",
            "<input type=\"password\" id=\"id_password\" name=\"password\"></p>",
            "<button type=\"submit\">Login</button></form>",
            "<p><a href=\"/forgot_password/\">Forgot password?</a></p>"
        ),
        username = escape_html(username),
    );
    layout("Login", chrome, &body)
}

/// Password reset form.
pub fn forgot_password_form(chrome: &Chrome) -> String {
    let body = concat!(
        "<form method=\"post\" action=\"/forgot_password/\">",
        "<p><label for=\"id_username\">Username</label>",
        "<input type=\"text\" id=\"id_username\" name=\"username\"></p>",
        "<p><label for=\"id_new_password\">New password</label>",
        "<input type=\"password\" id=\"id_new_password\" name=\"new_password\"></p>",
        "<p><label for=\"id_confirm_password\">Confirm password</label>",
        "<input type=\"password\" id=\"id_confirm_password\" name=\"confirm_password\"></p>",
        "<button type=\"submit\">Reset password</button></form>"
    );
    layout("Forgot password", chrome, body)
}

/// Standalone error page; rendered without session access.
pub fn error_page(status: StatusCode, message: &str, trace_id: Option<&str>) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let reference = trace_id
        .map(|id| format!("<p class=\"trace\">Reference: <code>{}</code></p>", escape_html(id)))
        .unwrap_or_default();
    layout(
        title,
        &Chrome::default(),
        &format!(
            "<p class=\"error\">{}</p>{reference}<p><a href=\"/\">Back to list</a></p>",
            escape_html(message)
        ),
    )
}

#[cfg(test)]
mod tests {
    //! Rendering checks for escaping and list view furniture.
    use super::*;
    use crate::domain::{EmailStatus, EnrollmentAnalytics, ListingRequest, StudentId};
    use crate::inbound::http::session::Flash;
    use pagination::Paginator;
    use rstest::{fixture, rstest};

    fn student(id: i64, first: &str, enrolled: &str) -> Student {
        let draft = StudentPayload {
            first_name: Some(first.to_owned()),
            last_name: Some("Lee".to_owned()),
            email: Some(format!("s{id}@example.com")),
            date_of_birth: Some("2010-01-01".to_owned()),
            enrollment_date: Some(enrolled.to_owned()),
            grade: Some("4".to_owned()),
        }
        .validate(EmailStatus::Available)
        .expect("valid draft");
        Student::new(StudentId::new(id).expect("positive id"), draft)
    }

    #[fixture]
    fn listing() -> StudentListing {
        let students = vec![
            student(1, "<Ann>", "2023-01-10"),
            student(2, "Bo", "2023-06-15"),
            student(3, "Cy", "2023-11-01"),
        ];
        let analytics =
            EnrollmentAnalytics::from_dates(students.iter().map(Student::enrollment_date));
        let request = ListingRequest::from_raw(None, Some("2023"), Some("1"), Some("2"));
        let page = Paginator::new(students.len(), request.page_size())
            .paginate(students, request.page());
        StudentListing {
            page,
            request,
            available_years: vec![2022, 2023],
            analytics,
        }
    }

    #[rstest]
    fn escape_covers_quotes_and_ampersands() {
        assert_eq!(escape_html("Tom & 'Jerry'"), "Tom &amp; &#x27;Jerry&#x27;");
    }

    #[rstest]
    fn list_page_renders_page_links_and_selected_year(listing: StudentListing) {
        let page = student_list(
            &listing,
            "selected_year=2023&records_per_page=1&page=2",
            &Chrome::default(),
        );
        assert!(page.contains("Page 2 of 3"));
        assert!(page.contains("href=\"?selected_year=2023&amp;records_per_page=1&amp;page=3\""));
        assert!(page.contains("<option value=\"2023\" selected>2023</option>"));
        assert!(page.contains("<option value=\"1\" selected>1</option>"));
        assert!(page.contains("\"pieChartData\":[1,1,1]"));
        assert!(page.contains("<li>January - April: 1</li>"));
    }

    #[rstest]
    fn list_page_escapes_names() {
        let students = vec![student(1, "<Ann>", "2023-01-10")];
        let request = ListingRequest::default();
        let page = Paginator::new(1, request.page_size()).paginate(students, None);
        let listing = StudentListing {
            page,
            request,
            available_years: vec![2023],
            analytics: EnrollmentAnalytics::default(),
        };
        let html = student_list(&listing, "", &Chrome::default());
        assert!(html.contains("&lt;Ann&gt; Lee"));
        assert!(!html.contains("<Ann>"));
    }

    #[rstest]
    fn form_shows_placeholders_values_and_errors() {
        let payload = StudentPayload {
            email: Some("nope".to_owned()),
            ..StudentPayload::default()
        };
        let errors = payload
            .validate(EmailStatus::Available)
            .expect_err("incomplete payload");
        let html = student_form(
            "Add student",
            "/student/new/",
            &payload,
            Some(&errors),
            &Chrome::default(),
        );
        assert!(html.contains("placeholder=\"Enter first name\""));
        assert!(html.contains("placeholder=\"Enter grade (1-12)\""));
        assert!(html.contains("value=\"nope\""));
        assert!(html.contains("Please enter a valid email address."));
        assert!(html.contains("This field is required."));
    }

    #[rstest]
    fn form_without_errors_has_no_error_list() {
        let html = student_form(
            "Add student",
            "/student/new/",
            &StudentPayload::default(),
            None,
            &Chrome::default(),
        );
        assert!(!html.contains("errorlist"));
    }

    #[rstest]
    fn chrome_renders_flashes_and_account_links() {
        let chrome = Chrome {
            flashes: vec![Flash::success("Saved <ok>")],
            authenticated: true,
        };
        let html = login_form("", &chrome);
        assert!(html.contains("<li class=\"success\">Saved &lt;ok&gt;</li>"));
        assert!(html.contains("action=\"/logout/\""));
        assert!(!html.contains("href=\"/register/\""));
    }

    #[rstest]
    fn error_page_uses_reason_phrase() {
        let html = error_page(StatusCode::NOT_FOUND, "student 4 not found", None);
        assert!(html.contains("<h1>Not Found</h1>"));
        assert!(html.contains("student 4 not found"));
        assert!(!html.contains("Reference:"));
    }
}
