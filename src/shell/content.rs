use serde::Serialize;

use crate::state::window::WindowId;

/// Renderable body of a window. Views show it as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowContent {
    pub heading: String,
    pub lines: Vec<String>,
}

impl WindowContent {
    fn new(heading: &str, lines: &[&str]) -> Self {
        Self {
            heading: heading.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Supplies the body for each window id
pub trait ContentProvider: Send {
    fn content(&self, id: WindowId) -> WindowContent;
}

/// Portfolio pages and toy apps that ship with the shell
#[derive(Debug, Default, Clone, Copy)]
pub struct PortfolioContent;

impl ContentProvider for PortfolioContent {
    fn content(&self, id: WindowId) -> WindowContent {
        match id {
            WindowId::About => WindowContent::new(
                "Kiseko Joseph Musyoka",
                &[
                    "Computer Science Student",
                    "BSc Computer Science, University of Embu (2021 - Present)",
                    "",
                    "Goals:",
                    "- Gain practical experience through industrial attachment",
                    "- Grow in full-stack web development and cloud technologies",
                    "- Build tech that solves real-world problems",
                ],
            ),
            WindowId::Skills => WindowContent::new(
                "Skills",
                &[
                    "Languages: Python, JavaScript, TypeScript, Java, C/C++",
                    "Web: React, HTML/CSS, Node.js, Tailwind CSS",
                    "Data: MySQL, PostgreSQL",
                    "Tools: Git/GitHub, Linux",
                    "Soft skills: Problem Solving, Teamwork",
                ],
            ),
            WindowId::Projects => WindowContent::new(
                "Projects",
                &[
                    "Student Management System - records, grades and attendance",
                    "E-Commerce Platform - auth, catalog, cart and payments",
                    "Weather Forecast App - real-time forecasts from external APIs",
                    "Task Management CLI - tasks and projects from the terminal",
                    "Portfolio Website - this desktop",
                ],
            ),
            WindowId::Experience => WindowContent::new(
                "Experience & Activities",
                &[
                    "2021 - Present  Computer Science Student",
                    "2023            Lab Assistant (Volunteer)",
                    "2023            Team Lead - Group Project",
                    "2022            Hackathon Participant",
                ],
            ),
            WindowId::Contact => WindowContent::new(
                "Contact",
                &[
                    "Let's connect and discuss opportunities",
                    "Email: kisekojoseph@example.com",
                    "Phone: +254 700 000 000",
                ],
            ),
            WindowId::Cv => WindowContent::new(
                "CV & Attachment Letter",
                &[
                    "Curriculum Vitae",
                    "Attachment Letter",
                    "Professional documents for employment",
                ],
            ),
            WindowId::Paint => WindowContent::new(
                "Paint",
                &["Brush, eraser and colour palette", "Canvas: 640 x 400"],
            ),
            WindowId::Explorer => WindowContent::new(
                "File Explorer",
                &[
                    "Projects/",
                    "Documents/  Resume.pdf, Cover Letter.docx",
                    "Certificates/",
                    "Skills/     frontend.md",
                ],
            ),
            WindowId::Photos => WindowContent::new(
                "Photos",
                &[
                    "Student Management System Dashboard",
                    "E-Commerce Product Listing",
                    "Weather App Interface",
                    "Portfolio Design",
                ],
            ),
        }
    }
}
