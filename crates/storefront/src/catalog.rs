//! Static course catalog.
//!
//! The catalog is compiled in rather than stored in the database; courses
//! change with deployments, not at runtime.

use std::sync::OnceLock;

use rust_decimal::Decimal;

use learnsphere_core::CourseId;

/// A downloadable PDF course.
#[derive(Debug, Clone)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub description: String,
    /// Prices are whole rupees today, but kept as `Decimal` because the
    /// transactions table stores NUMERIC totals.
    pub price: Decimal,
    /// Card image for the course grid.
    pub image: String,
    /// Wide image for the hero slider.
    pub hero_image: String,
}

/// Number of courses featured in the hero slider.
const FEATURED_COUNT: usize = 4;

fn course(
    id: i32,
    name: &str,
    description: &str,
    price: u32,
    image_tag: &str,
    hero_tag: &str,
) -> Course {
    Course {
        id: CourseId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        price: Decimal::from(price),
        image: format!("https://source.unsplash.com/random/600x400?{image_tag}"),
        hero_image: format!("https://source.unsplash.com/random/1200x600?{hero_tag}"),
    }
}

fn build_catalog() -> Vec<Course> {
    vec![
        course(
            1,
            "Web Development Fundamentals",
            "Master the building blocks of modern web development with HTML, CSS, and JavaScript.",
            49,
            "web-development",
            "web-development",
        ),
        course(
            2,
            "Graphic Design Principles",
            "Learn the fundamentals of visual communication and create stunning designs.",
            39,
            "graphic-design",
            "design",
        ),
        course(
            3,
            "Python for Data Science",
            "Harness the power of Python for data analysis, visualization, and machine learning.",
            59,
            "python",
            "data-science",
        ),
        course(
            4,
            "Digital Marketing Mastery",
            "Develop effective marketing strategies for the digital age.",
            45,
            "marketing",
            "digital-marketing",
        ),
        course(
            5,
            "Mobile App Development (React Native)",
            "Build cross-platform mobile apps with React Native.",
            69,
            "react-native",
            "mobile-app",
        ),
        course(
            6,
            "Cybersecurity Essentials",
            "Protect systems and networks from digital attacks.",
            55,
            "cybersecurity",
            "security",
        ),
        course(
            7,
            "Cloud Computing with AWS",
            "Learn to deploy, manage, and scale applications on AWS.",
            79,
            "aws",
            "cloud-computing",
        ),
        course(
            8,
            "Project Management (PMP Prep)",
            "Master project management methodologies and prepare for PMP certification.",
            89,
            "project-management",
            "management",
        ),
    ]
}

/// All courses, in catalog order.
pub fn all() -> &'static [Course] {
    static CATALOG: OnceLock<Vec<Course>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// Courses featured in the hero slider (the first four).
#[must_use]
pub fn featured() -> &'static [Course] {
    &all()[..FEATURED_COUNT]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_eight_courses() {
        assert_eq!(all().len(), 8);
    }

    #[test]
    fn test_ids_are_sequential_and_unique() {
        for (i, course) in all().iter().enumerate() {
            assert_eq!(course.id, CourseId::new(i32::try_from(i).unwrap() + 1));
        }
    }

    #[test]
    fn test_featured_are_first_four() {
        let featured = featured();
        assert_eq!(featured.len(), 4);
        assert_eq!(featured[0].name, "Web Development Fundamentals");
        assert_eq!(featured[3].name, "Digital Marketing Mastery");
    }

    #[test]
    fn test_catalog_prices() {
        let prices: Vec<u32> = vec![49, 39, 59, 45, 69, 55, 79, 89];
        for (course, price) in all().iter().zip(prices) {
            assert_eq!(course.price, Decimal::from(price));
        }
    }
}
