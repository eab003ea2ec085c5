use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::error::ValidationError;
use crate::store::{Fields, Record};
use crate::utils::fields::{optional_list, optional_text, string_list, text, Delimiter};
use crate::validation::{Choice, Payload};

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

choice_enum!(
    Experience {
        UpToTwo => "0-2",
        ThreeToFive => "3-5",
        SixToTen => "6-10",
        MoreThanTen => "10+",
    }
);

choice_enum!(
    SalaryRange {
        Below15k => "Less than $15K USD/year",
        From15kTo30k => "$15K - $30K USD/year",
        From30kTo45k => "$30K - $45K USD/year",
        From45kTo60k => "$45K - $60K USD/year",
        From60kTo75k => "$60K - $75K USD/year",
        From75kTo90k => "$75K - $90K USD/year",
        From90kTo120k => "$90K - $120K USD/year",
        From120kTo150k => "$120K - $150K USD/year",
        Above150k => "More than $150K USD/year",
    }
);

choice_enum!(
    JobFunction {
        Engineering => "Engineering",
        Product => "Product",
        Design => "Design",
        Data => "Data",
        Marketing => "Marketing",
        Sales => "Sales",
        CustomerSuccess => "Customer Success",
        Operations => "Operations",
        Finance => "Finance",
        HumanResources => "Human Resources",
        Legal => "Legal",
        Other => "Other",
    }
);

choice_enum!(
    Relationship {
        CurrentEmployee => "Current Employee",
        FormerEmployee => "Former Employee",
        Client => "Client",
        Vendor => "Vendor",
        FriendOrFamily => "Friend or Family",
        Other => "Other",
    }
);

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn insert_opt(fields: &mut Fields, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn insert(fields: &mut Fields, key: &str, value: &str) {
    fields.insert(key.to_string(), Value::String(value.to_string()));
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub job_id: Option<String>,
    pub title: String,
    pub company: String,
    pub industry: String,
    pub function: String,
    pub location: String,
    pub salary_range: String,
    pub employment_type: String,
    pub skills: Vec<String>,
    pub description: String,
    pub responsibilities: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub company_description: Option<String>,
    pub posted_date: Option<String>,
    pub application_deadline: Option<String>,
    pub category: Option<String>,
}

impl Job {
    pub const JOB_ID: &'static str = "Job ID";
    pub const TITLE: &'static str = "Job Title";

    /// Missing upstream text defaults to `""` and missing skills to `[]`.
    pub fn from_record(record: &Record) -> Self {
        let fields = &record.fields;
        Self {
            id: record.id.clone(),
            job_id: optional_text(fields, Self::JOB_ID),
            title: text(fields, Self::TITLE),
            company: text(fields, "Company"),
            industry: text(fields, "Industry"),
            function: text(fields, "Function"),
            location: text(fields, "Location"),
            salary_range: text(fields, "Salary Range"),
            employment_type: text(fields, "Employment Type"),
            skills: string_list(fields, "Skills", Delimiter::Comma),
            description: text(fields, "Description"),
            responsibilities: optional_list(fields, "Responsibilities", Delimiter::Newline),
            requirements: optional_list(fields, "Requirements", Delimiter::Newline),
            benefits: optional_list(fields, "Benefits", Delimiter::Newline),
            company_description: optional_text(fields, "Company Description"),
            posted_date: optional_text(fields, "Posted Date"),
            application_deadline: optional_text(fields, "Application Deadline"),
            category: optional_text(fields, "Category"),
        }
    }

    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    /// Whether a legacy path segment (`<title-slug>` or `<title-slug>-<job id>`) points at this job.
    pub fn matches_slug(&self, segment: &str) -> bool {
        let slug = self.slug();
        if slug.is_empty() {
            return false;
        }
        let segment = segment.trim().to_lowercase();
        if segment == slug {
            return true;
        }
        match &self.job_id {
            Some(job_id) => segment == format!("{slug}-{}", slugify(job_id)),
            None => false,
        }
    }
}

pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

pub trait Submission {
    fn to_fields(&self) -> Fields;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateReferral {
    pub referrer_name: String,
    pub referrer_email: String,
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone: String,
    pub resume_urls: Vec<String>,
    pub job_id: String,
    pub message: Option<String>,
}

impl CandidateReferral {
    pub fn from_payload(payload: &Payload<'_>) -> Result<Self, ValidationError> {
        let referrer_name = payload.required("referrerName", "Referrer name")?;
        let referrer_email = payload.required_email("referrerEmail", "Referrer email")?;
        let candidate_name = payload.required("candidateName", "Candidate name")?;
        let candidate_email = payload.required_email("candidateEmail", "Candidate email")?;
        let candidate_phone = payload.required("candidatePhone", "Candidate phone")?;
        let resume_urls = payload.url_list("resumeUrls", "Resume")?;
        if resume_urls.is_empty() {
            return Err(ValidationError::new("At least one resume is required"));
        }
        let job_id = payload.required("jobId", "Job ID")?;
        let message = payload.optional("message", "Message")?;

        Ok(Self {
            referrer_name,
            referrer_email,
            candidate_name,
            candidate_email,
            candidate_phone,
            resume_urls,
            job_id,
            message,
        })
    }
}

impl Submission for CandidateReferral {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        insert(&mut fields, "Referrer Name", &self.referrer_name);
        insert(&mut fields, "Referrer Email", &self.referrer_email);
        insert(&mut fields, "Candidate Name", &self.candidate_name);
        insert(&mut fields, "Candidate Email", &self.candidate_email);
        insert(&mut fields, "Candidate Phone", &self.candidate_phone);
        let attachments: Vec<Value> = self
            .resume_urls
            .iter()
            .map(|url| json!({ "url": url }))
            .collect();
        fields.insert("Resume".to_string(), Value::Array(attachments));
        insert(&mut fields, "Job ID", &self.job_id);
        insert_opt(&mut fields, "Message", self.message.as_deref());
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyReferral {
    pub referrer_name: String,
    pub referrer_email: String,
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub relationship: Relationship,
    pub company_linkedin: Option<String>,
}

impl CompanyReferral {
    pub fn from_payload(payload: &Payload<'_>) -> Result<Self, ValidationError> {
        Ok(Self {
            referrer_name: payload.required("referrerName", "Referrer name")?,
            referrer_email: payload.required_email("referrerEmail", "Referrer email")?,
            company_name: payload.required("companyName", "Company name")?,
            contact_name: payload.required("contactName", "Contact name")?,
            contact_email: payload.required_email("contactEmail", "Contact email")?,
            contact_phone: payload.required("contactPhone", "Contact phone")?,
            relationship: payload.required_choice("relationship", "Relationship")?,
            company_linkedin: payload.optional("companyLinkedin", "Company LinkedIn")?,
        })
    }
}

impl Submission for CompanyReferral {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        insert(&mut fields, "Referrer Name", &self.referrer_name);
        insert(&mut fields, "Referrer Email", &self.referrer_email);
        insert(&mut fields, "Company Name", &self.company_name);
        insert(&mut fields, "Contact Name", &self.contact_name);
        insert(&mut fields, "Contact Email", &self.contact_email);
        insert(&mut fields, "Contact Phone", &self.contact_phone);
        insert(&mut fields, "Relationship", self.relationship.as_str());
        insert_opt(
            &mut fields,
            "Company LinkedIn",
            self.company_linkedin.as_deref(),
        );
        fields
    }
}

/// An entry in the open resume pool. Inbound keys are the upstream column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePoolEntry {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub job_title: String,
    pub function: JobFunction,
    pub experience: Experience,
    pub skills: String,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: Option<String>,
    pub salary_expectations: Option<String>,
    pub additional_info: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl ResumePoolEntry {
    pub fn from_payload(
        payload: &Payload<'_>,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            full_name: payload.required("Full Name", "Full name")?,
            email: payload.required_email("Email", "Email")?,
            phone: payload.required("Phone", "Phone")?,
            location: payload.required("Location", "Location")?,
            job_title: payload.required("Job Title", "Job title")?,
            function: payload.required_choice("Function", "Function")?,
            experience: payload.required_choice("Years of Experience", "Years of experience")?,
            skills: payload.required("Skills", "Skills")?,
            linkedin_url: payload.optional("LinkedIn URL", "LinkedIn URL")?,
            portfolio_url: payload.optional("Portfolio URL", "Portfolio URL")?,
            resume_url: payload.optional("Resume URL", "Resume URL")?,
            salary_expectations: payload.optional("Salary Expectations", "Salary expectations")?,
            additional_info: payload.optional("Additional Info", "Additional info")?,
            submitted_at,
        })
    }
}

impl Submission for ResumePoolEntry {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        insert(&mut fields, "Full Name", &self.full_name);
        insert(&mut fields, "Email", &self.email);
        insert(&mut fields, "Phone", &self.phone);
        insert(&mut fields, "Location", &self.location);
        insert(&mut fields, "Job Title", &self.job_title);
        insert(&mut fields, "Function", self.function.as_str());
        insert(&mut fields, "Years of Experience", self.experience.as_str());
        insert(&mut fields, "Skills", &self.skills);
        insert_opt(&mut fields, "LinkedIn URL", self.linkedin_url.as_deref());
        insert_opt(&mut fields, "Portfolio URL", self.portfolio_url.as_deref());
        insert_opt(&mut fields, "Resume URL", self.resume_url.as_deref());
        insert_opt(
            &mut fields,
            "Salary Expectations",
            self.salary_expectations.as_deref(),
        );
        insert_opt(
            &mut fields,
            "Additional Info",
            self.additional_info.as_deref(),
        );
        insert(&mut fields, "Submission Date", &timestamp(&self.submitted_at));
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin_url: String,
    pub experience: Experience,
    pub salary_range: SalaryRange,
    pub cv_url: String,
    pub job_id: String,
    pub job_title: String,
    pub applied_at: DateTime<Utc>,
}

impl JobApplication {
    pub fn from_payload(
        payload: &Payload<'_>,
        applied_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            full_name: payload.required("fullName", "Full name")?,
            email: payload.required_email("email", "Email")?,
            phone: payload.required("phone", "Phone")?,
            linkedin_url: payload.required_url("linkedinUrl", "LinkedIn URL")?,
            experience: payload.required_choice("experience", "Years of experience")?,
            salary_range: payload.required_choice("salaryRange", "Salary range")?,
            cv_url: payload.required_url("cvUrl", "CV URL")?,
            job_id: payload.required("jobId", "Job ID")?,
            job_title: payload.required("jobTitle", "Job title")?,
            applied_at,
        })
    }
}

impl Submission for JobApplication {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        insert(&mut fields, "Full Name", &self.full_name);
        insert(&mut fields, "Email", &self.email);
        insert(&mut fields, "Phone", &self.phone);
        insert(&mut fields, "LinkedIn URL", &self.linkedin_url);
        insert(&mut fields, "Years of Experience", self.experience.as_str());
        insert(&mut fields, "Salary Range", self.salary_range.as_str());
        insert(&mut fields, "CV URL", &self.cv_url);
        insert(&mut fields, "Job ID", &self.job_id);
        insert(&mut fields, "Job Title", &self.job_title);
        insert(&mut fields, "Application Date", &timestamp(&self.applied_at));
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRequest {
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub position_title: String,
    pub function: Option<String>,
    pub number_of_positions: Option<Value>,
    pub job_description: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl CandidateRequest {
    pub fn from_payload(
        payload: &Payload<'_>,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            company_name: payload.required("companyName", "Company name")?,
            contact_name: payload.required("contactName", "Contact name")?,
            contact_email: payload.required_email("contactEmail", "Contact email")?,
            contact_phone: payload.required("contactPhone", "Contact phone")?,
            position_title: payload.required("positionTitle", "Position title")?,
            function: payload.optional("function", "Function")?,
            number_of_positions: payload.passthrough("numberOfPositions"),
            job_description: payload.optional("jobDescription", "Job description")?,
            submitted_at,
        })
    }
}

impl Submission for CandidateRequest {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        insert(&mut fields, "Company Name", &self.company_name);
        insert(&mut fields, "Contact Name", &self.contact_name);
        insert(&mut fields, "Contact Email", &self.contact_email);
        insert(&mut fields, "Contact Phone", &self.contact_phone);
        insert(&mut fields, "Position Title", &self.position_title);
        insert_opt(&mut fields, "Function", self.function.as_deref());
        if let Some(count) = &self.number_of_positions {
            fields.insert("Number of Positions".to_string(), count.clone());
        }
        insert_opt(
            &mut fields,
            "Job Description",
            self.job_description.as_deref(),
        );
        insert(&mut fields, "Submission Date", &timestamp(&self.submitted_at));
        fields
    }
}
