//! Built-in data set
//!
//! Used for any collection that has no stored snapshot at startup. The
//! user directory and the feed are never persisted and always start here.

use chrono::{Duration, SecondsFormat, Utc};
use shared::models::{HardwareItem, Post, ProblemStatement, Reply, User, UserRole};

/// Display name for posts and replies written by an administrator
pub const OFFICIAL_AUTHOR_NAME: &str = "IC Club Official";

// (id, name, email, city, join_date, roll_number, department, year)
const STUDENTS: &[(&str, &str, &str, &str, &str, &str, &str, &str)] = &[
    ("u1", "Rahul Kumar", "rahul@sona.edu", "Salem", "2023-09-15", "21IT101", "IT", "3rd Year"),
    ("u2", "Priya Sharma", "priya@sona.edu", "Chennai", "2023-09-02", "21CS045", "CSE", "3rd Year"),
    ("u3", "Arun Vijay", "arun@sona.edu", "Coimbatore", "2023-10-10", "22ME012", "Mech", "2nd Year"),
    ("u4", "Sneha Gupta", "sneha@sona.edu", "Bangalore", "2023-11-05", "21EC088", "ECE", "3rd Year"),
    ("u5", "Karthik Raja", "karthik@sona.edu", "Salem", "2024-01-12", "22EE034", "EEE", "2nd Year"),
    ("u6", "Divya M", "divya@sona.edu", "Madurai", "2024-02-20", "21IT056", "IT", "4th Year"),
    ("u7", "Sanjay B", "sanjay@sona.edu", "Salem", "2024-03-01", "23CS102", "CSE", "1st Year"),
];

/// Student directory
pub fn users() -> Vec<User> {
    STUDENTS
        .iter()
        .map(
            |&(id, name, email, city, join_date, roll_number, department, year)| User {
                id: id.into(),
                name: name.into(),
                email: email.into(),
                role: UserRole::User,
                roll_number: Some(roll_number.into()),
                phone: None,
                city: Some(city.into()),
                join_date: Some(join_date.into()),
                avatar: None,
                department: Some(department.into()),
                year: Some(year.into()),
            },
        )
        .collect()
}

fn item(
    id: &str,
    name: &str,
    description: &str,
    price_per_day: u32,
    available: bool,
    stock: u32,
    category: &str,
) -> HardwareItem {
    HardwareItem {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        price_per_day,
        image: format!("https://picsum.photos/400/300?random={}", id),
        available,
        stock,
        category: category.into(),
    }
}

/// Starting catalog
pub fn hardware() -> Vec<HardwareItem> {
    vec![
        item(
            "1",
            "Arduino Uno R3",
            "Microcontroller board based on the ATmega328P. Perfect for beginners.",
            50,
            true,
            10,
            "Microcontrollers",
        ),
        item(
            "2",
            "Raspberry Pi 4 (4GB)",
            "A powerful quad-core computer capable of dual-display support at resolutions up to 4K.",
            150,
            true,
            5,
            "Single Board Computers",
        ),
        item(
            "3",
            "Ultrasonic Sensor HC-SR04",
            "Provides 2cm - 400cm non-contact measurement functionality.",
            20,
            true,
            25,
            "Sensors",
        ),
        item(
            "4",
            "SG90 Micro Servo Motor",
            "Tiny and lightweight with high output power. Ideal for RC projects.",
            30,
            false,
            0,
            "Motors",
        ),
        item(
            "5",
            "Drone Kit (DIY)",
            "Complete kit to build your own quadcopter. Flight controller included.",
            500,
            true,
            2,
            "Robotics",
        ),
    ]
}

fn hours_ago(hours: i64) -> String {
    (Utc::now() - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn reply(id: &str, author_id: &str, author_name: &str, content: &str) -> Reply {
    Reply {
        id: id.into(),
        author_id: author_id.into(),
        author_name: author_name.into(),
        content: content.into(),
        timestamp: hours_ago(0),
        is_verified: false,
    }
}

/// Starting community feed, newest first
pub fn posts() -> Vec<Post> {
    vec![
        Post {
            id: "101".into(),
            author_id: "admin".into(),
            author_name: OFFICIAL_AUTHOR_NAME.into(),
            title: Some("Hackathon Alert".into()),
            content: "We are excited to announce the \"Green Tech Challenge\" starting next week. \
                      Teams of 4. Grand prize: Raspberry Pi 5 Kits! Who is in?"
                .into(),
            image: Some(
                "https://images.unsplash.com/photo-1531482615713-2afd69097998?auto=format&fit=crop&q=80&w=1000"
                    .into(),
            ),
            timestamp: hours_ago(0),
            likes: 142,
            replies: vec![
                reply("r1", "u1", "Rahul Kumar", "Count me in! Looking for teammates."),
                reply(
                    "r2",
                    "u4",
                    "Sneha Gupta",
                    "Is there a specific theme for the projects?",
                ),
            ],
            reposts: 12,
            is_verified: true,
        },
        Post {
            id: "102".into(),
            author_id: "u1".into(),
            author_name: "Rahul Kumar".into(),
            title: None,
            content: "Has anyone worked with the ESP32-CAM module? I am getting a brownout error \
                      whenever I turn on the flash. I suspect it is a power supply issue. Any tips?"
                .into(),
            image: None,
            timestamp: hours_ago(1),
            likes: 5,
            replies: vec![],
            reposts: 0,
            is_verified: false,
        },
        Post {
            id: "103".into(),
            author_id: "u2".into(),
            author_name: "Priya S.".into(),
            title: None,
            content: "Finally finished my automated irrigation system using the moisture sensors \
                      from the club inventory! It sends me a WhatsApp message when the plants need \
                      water.\n\nCheck out the setup!"
                .into(),
            image: Some(
                "https://images.unsplash.com/photo-1558449028-b53a39d100fc?auto=format&fit=crop&q=80&w=1000"
                    .into(),
            ),
            timestamp: hours_ago(24),
            likes: 89,
            replies: vec![reply(
                "r3",
                "u3",
                "Arun Vijay",
                "This looks amazing! Can you share the code?",
            )],
            reposts: 4,
            is_verified: false,
        },
        Post {
            id: "104".into(),
            author_id: "u4".into(),
            author_name: "Sneha Gupta".into(),
            title: None,
            content: "Just returned the Drone Kit. It was an amazing experience learning flight \
                      dynamics. If anyone needs the flight controller config I used, DM me!"
                .into(),
            image: None,
            timestamp: hours_ago(48),
            likes: 34,
            replies: vec![],
            reposts: 1,
            is_verified: false,
        },
    ]
}

/// Starting problem statements
pub fn problem_statements() -> Vec<ProblemStatement> {
    vec![ProblemStatement {
        id: "p1".into(),
        title: "Smart Campus Energy Management".into(),
        description: "Develop a system to monitor and optimize electricity usage in the main \
                      block classrooms."
            .into(),
        deadline: "2024-12-01".into(),
    }]
}
