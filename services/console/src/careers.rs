use crate::infra::ConsoleNotifier;
use clap::{Args, Subcommand};
use hr_portal::careers::{
    ApplicationDesk, ApplicationFields, ApplicationType, HttpSubmissionGateway, JobBoard,
};
use hr_portal::config::AppConfig;
use hr_portal::error::AppError;
use hr_portal::forms::FormSlot;
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub(crate) enum JobsCommand {
    /// List openings, optionally for one department
    List {
        /// Department name; "Все" shows everything
        #[arg(long)]
        department: Option<String>,
    },
    /// List the department filter options
    Departments,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ApplyCommand {
    /// Apply for an open position
    Applicant(ApplicantArgs),
    /// Apply for an internship or student program
    Student(StudentArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ContactArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    surname: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    /// Portfolio or profile link (http or https)
    #[arg(long)]
    portfolio_url: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ApplicantArgs {
    #[command(flatten)]
    contact: ContactArgs,
    #[arg(long)]
    position: Option<String>,
    /// Years of experience
    #[arg(long)]
    experience: Option<u32>,
    #[arg(long)]
    cover_letter: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct StudentArgs {
    #[command(flatten)]
    contact: ContactArgs,
    #[arg(long)]
    university: Option<String>,
    /// Year of study, 1 to 6
    #[arg(long)]
    course: Option<u8>,
    #[arg(long)]
    specialty: Option<String>,
    #[arg(long)]
    direction: Option<String>,
    #[arg(long)]
    motivation_letter: Option<String>,
}

impl ContactArgs {
    fn into_fields(self) -> ApplicationFields {
        ApplicationFields {
            name: self.name,
            surname: self.surname,
            email: self.email,
            phone: self.phone,
            portfolio_url: self.portfolio_url,
            ..ApplicationFields::default()
        }
    }
}

impl ApplyCommand {
    fn into_form(self) -> (ApplicationType, ApplicationFields) {
        match self {
            ApplyCommand::Applicant(args) => (
                ApplicationType::Applicant,
                ApplicationFields {
                    position: args.position,
                    experience_years: args.experience,
                    cover_letter: args.cover_letter,
                    ..args.contact.into_fields()
                },
            ),
            ApplyCommand::Student(args) => (
                ApplicationType::Student,
                ApplicationFields {
                    university: args.university,
                    course: args.course,
                    specialty: args.specialty,
                    direction: args.direction,
                    motivation_letter: args.motivation_letter,
                    ..args.contact.into_fields()
                },
            ),
        }
    }
}

pub(crate) fn run_jobs(command: JobsCommand) {
    let mut board = JobBoard::default();
    match command {
        JobsCommand::Departments => {
            for department in board.departments() {
                println!("{department}");
            }
        }
        JobsCommand::List { department } => {
            if let Some(department) = department {
                board.select_department(department);
            }
            let postings = board.visible_postings();
            println!(
                "Открытые вакансии ({}): {}",
                board.selected_department(),
                postings.len()
            );
            for posting in postings {
                println!(
                    "\n#{} {} | {} | {} | {}",
                    posting.id,
                    posting.title,
                    posting.department,
                    posting.location,
                    posting.employment_type
                );
                println!("  {}", posting.description);
            }
        }
    }
}

pub(crate) async fn run_apply(config: &AppConfig, command: ApplyCommand) -> Result<(), AppError> {
    let gateway = HttpSubmissionGateway::new(
        config.endpoints.submission_url.clone(),
        config.endpoints.request_timeout,
    )?;
    let desk = ApplicationDesk::new(Arc::new(gateway), Arc::new(ConsoleNotifier));

    let (application_type, fields) = command.into_form();
    let form = FormSlot::new(fields);
    let confirmation = desk.submit(&form, application_type).await?;

    if let Some(id) = confirmation.receipt.application_id {
        println!("Номер анкеты: {id}");
    }
    if let Some(message) = confirmation.receipt.message.as_deref() {
        println!("{message}");
    }
    Ok(())
}
