//! Markdown story templates, stamped with the day they were generated.

use chrono::{Local, NaiveDate};

use crate::params::{BugReportParams, FeatureRequestParams};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn bug_report(params: &BugReportParams, date: NaiveDate) -> String {
    format!(
        "# {title}\n\n\
         ## Bug Description\n\
         A bug has been identified that needs to be addressed.\n\n\
         ## Steps to Reproduce\n{steps}\n\n\
         ## Expected Behavior\n{expected}\n\n\
         ## Actual Behavior\n{actual}\n\n\
         ## Additional Context\n\
         Bug reported on {date}\n",
        title = params.title,
        steps = params.steps,
        expected = params.expected,
        actual = params.actual,
        date = date.format("%Y-%m-%d"),
    )
}

pub fn feature_request(params: &FeatureRequestParams, date: NaiveDate) -> String {
    format!(
        "# {title}\n\n\
         ## Feature Description\n{description}\n\n\
         ## User Value\n{user_value}\n\n\
         ## Acceptance Criteria\n{criteria}\n\n\
         ## Additional Notes\n\
         Feature requested on {date}\n",
        title = params.title,
        description = params.description,
        user_value = params.user_value,
        criteria = params.acceptance_criteria,
        date = date.format("%Y-%m-%d"),
    )
}
