use std::collections::BTreeMap;

use super::applicability::Applicability;
use super::domain::{AnswerOption, Category, Question, QuestionId};

use Category::{Ai, Automation, Cinema, Photo, Tech, Web};

pub(crate) fn standard_questions() -> Vec<Question> {
    vec![
        Question::single(
            "project_goal",
            "What is the main goal of your project?",
            vec![
                AnswerOption::new(
                    "online_presence",
                    "Build or improve my online presence",
                    &[(Web, 5.0), (Tech, 1.0)],
                ),
                AnswerOption::new(
                    "visual_content",
                    "Show my products or brand in strong images",
                    &[(Photo, 5.0), (Cinema, 1.0)],
                ),
                AnswerOption::new(
                    "video_story",
                    "Tell my story with video",
                    &[(Cinema, 5.0), (Photo, 1.0)],
                ),
                AnswerOption::new(
                    "save_time",
                    "Save time on repetitive work",
                    &[(Automation, 5.0), (Ai, 1.0)],
                ),
                AnswerOption::new(
                    "smart_features",
                    "Add intelligent features to my product",
                    &[(Ai, 5.0), (Tech, 1.0)],
                ),
                AnswerOption::new(
                    "infrastructure",
                    "Fix or modernise my technical setup",
                    &[(Tech, 5.0), (Automation, 1.0)],
                ),
            ],
        ),
        Question::single(
            "business_type",
            "Which best describes you?",
            vec![
                AnswerOption::new(
                    "solo_creator",
                    "Freelancer or creator",
                    &[(Photo, 2.0), (Web, 1.0), (Cinema, 1.0)],
                ),
                AnswerOption::new(
                    "small_business",
                    "Small business",
                    &[(Web, 2.0), (Automation, 1.0), (Photo, 1.0)],
                ),
                AnswerOption::new(
                    "startup",
                    "Startup",
                    &[(Ai, 2.0), (Tech, 2.0), (Web, 1.0)],
                ),
                AnswerOption::new(
                    "enterprise",
                    "Established company",
                    &[(Automation, 2.0), (Tech, 2.0), (Ai, 1.0)],
                ),
            ],
        ),
        Question::single(
            "website_status",
            "Where does your website stand today?",
            vec![
                AnswerOption::new("none", "I don't have one yet", &[(Web, 3.0)]),
                AnswerOption::new(
                    "outdated",
                    "It exists but feels outdated",
                    &[(Web, 3.0), (Photo, 1.0)],
                ),
                AnswerOption::new(
                    "slow",
                    "It works but is slow or hard to maintain",
                    &[(Web, 2.0), (Tech, 2.0)],
                ),
            ],
        )
        .shown_when(Applicability::equals("project_goal", "online_presence")),
        Question::multiple(
            "website_features",
            "Which features should the site offer?",
            vec![
                AnswerOption::new("online_shop", "Online shop", &[(Web, 3.0), (Automation, 1.0)]),
                AnswerOption::new(
                    "booking",
                    "Appointment booking",
                    &[(Web, 2.0), (Automation, 2.0)],
                ),
                AnswerOption::new("blog", "Blog or news", &[(Web, 2.0), (Ai, 1.0)]),
                AnswerOption::new("portfolio", "Portfolio", &[(Web, 2.0), (Photo, 2.0)]),
                AnswerOption::new("multilingual", "Several languages", &[(Web, 2.0), (Ai, 1.0)]),
            ],
        )
        .shown_when(Applicability::equals("project_goal", "online_presence")),
        Question::multiple(
            "visual_needs",
            "What kind of visual content do you need?",
            vec![
                AnswerOption::new("product_photos", "Product photos", &[(Photo, 4.0)]),
                AnswerOption::new("portraits", "Portraits and team photos", &[(Photo, 3.0)]),
                AnswerOption::new(
                    "events",
                    "Event coverage",
                    &[(Photo, 2.0), (Cinema, 2.0)],
                ),
                AnswerOption::new("promo_video", "Promotional video", &[(Cinema, 4.0)]),
                AnswerOption::new(
                    "drone",
                    "Aerial and drone footage",
                    &[(Cinema, 3.0), (Photo, 1.0)],
                ),
            ],
        )
        .shown_when(Applicability::any_of(
            "project_goal",
            &["visual_content", "video_story"],
        )),
        Question::single(
            "video_format",
            "Which video format fits best?",
            vec![
                AnswerOption::new(
                    "short_form",
                    "Short clips for social media",
                    &[(Cinema, 3.0), (Photo, 1.0)],
                ),
                AnswerOption::new("brand_film", "A brand film of a few minutes", &[(Cinema, 5.0)]),
                AnswerOption::new(
                    "series",
                    "A recurring series",
                    &[(Cinema, 4.0), (Automation, 1.0)],
                ),
            ],
        )
        .shown_when(Applicability::any(vec![
            Applicability::equals("project_goal", "video_story"),
            Applicability::equals("visual_needs", "promo_video"),
        ])),
        Question::multiple(
            "repetitive_tasks",
            "Which tasks eat most of your time?",
            vec![
                AnswerOption::new("email", "Email follow-ups", &[(Automation, 3.0), (Ai, 1.0)]),
                AnswerOption::new("invoicing", "Invoicing and bookkeeping", &[(Automation, 3.0)]),
                AnswerOption::new(
                    "customer_support",
                    "Answering customer questions",
                    &[(Ai, 4.0), (Automation, 1.0)],
                ),
                AnswerOption::new(
                    "data_entry",
                    "Copying data between tools",
                    &[(Automation, 3.0), (Ai, 1.0)],
                ),
                AnswerOption::new(
                    "content_creation",
                    "Writing content",
                    &[(Ai, 3.0), (Photo, 1.0)],
                ),
            ],
        )
        .shown_when(Applicability::any_of(
            "project_goal",
            &["save_time", "smart_features"],
        )),
        Question::single(
            "ai_readiness",
            "How far along are you with AI?",
            vec![
                AnswerOption::new("exploring", "Just exploring", &[(Ai, 2.0), (Tech, 1.0)]),
                AnswerOption::new("have_data", "We have data but no models", &[(Ai, 4.0)]),
                AnswerOption::new(
                    "in_production",
                    "AI already runs in production",
                    &[(Ai, 3.0), (Tech, 2.0)],
                ),
            ],
        )
        .shown_when(Applicability::any(vec![
            Applicability::equals("project_goal", "smart_features"),
            Applicability::any_of("repetitive_tasks", &["customer_support", "content_creation"]),
        ])),
        Question::multiple(
            "infrastructure_needs",
            "What needs attention in your setup?",
            vec![
                AnswerOption::new("hosting", "Hosting and deployment", &[(Tech, 3.0), (Web, 1.0)]),
                AnswerOption::new("security", "Security and backups", &[(Tech, 4.0)]),
                AnswerOption::new(
                    "integrations",
                    "Connecting tools together",
                    &[(Tech, 2.0), (Automation, 2.0)],
                ),
                AnswerOption::new(
                    "legacy_migration",
                    "Migrating legacy systems",
                    &[(Tech, 3.0), (Ai, 1.0)],
                ),
            ],
        )
        .shown_when(Applicability::equals("project_goal", "infrastructure")),
        Question::single(
            "budget",
            "What budget do you have in mind?",
            vec![
                AnswerOption::new("starter", "Starter", &[(Web, 1.0), (Photo, 1.0)]),
                AnswerOption::new(
                    "growth",
                    "Growth",
                    &[(Web, 1.0), (Automation, 1.0), (Cinema, 1.0)],
                ),
                AnswerOption::new(
                    "premium",
                    "Premium",
                    &[(Ai, 1.0), (Tech, 1.0), (Cinema, 1.0)],
                ),
            ],
        ),
        Question::single(
            "timeline",
            "When do you need results?",
            vec![
                AnswerOption::new("urgent", "Within a few weeks", &[(Web, 1.0), (Photo, 1.0)]),
                AnswerOption::new(
                    "this_quarter",
                    "This quarter",
                    &[(Automation, 1.0), (Cinema, 1.0)],
                ),
                AnswerOption::new("flexible", "No fixed deadline", &[(Ai, 1.0), (Tech, 1.0)]),
            ],
        )
        .marked_final_stage(),
    ]
}

pub(crate) fn standard_importance() -> BTreeMap<QuestionId, f64> {
    [
        ("project_goal", 2.0),
        ("website_features", 1.5),
        ("visual_needs", 1.5),
        ("repetitive_tasks", 1.5),
        ("infrastructure_needs", 1.5),
        ("budget", 0.5),
        ("timeline", 0.5),
    ]
    .into_iter()
    .map(|(id, multiplier)| (QuestionId::from(id), multiplier))
    .collect()
}
