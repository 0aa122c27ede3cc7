use serde::Serialize;

/// Sentinel department meaning "no filter".
pub const ALL_DEPARTMENTS: &str = "Все";

/// Published opening. The catalog is compiled in and never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobPosting {
    pub id: u32,
    pub title: &'static str,
    pub department: &'static str,
    pub location: &'static str,
    pub employment_type: &'static str,
    pub description: &'static str,
}

pub static JOB_POSTINGS: [JobPosting; 6] = [
    JobPosting {
        id: 1,
        title: "Frontend Developer",
        department: "Разработка",
        location: "Москва",
        employment_type: "Полная занятость",
        description: "Ищем опытного frontend-разработчика для работы над современными веб-приложениями.",
    },
    JobPosting {
        id: 2,
        title: "UX/UI Designer",
        department: "Дизайн",
        location: "Удалённо",
        employment_type: "Полная занятость",
        description: "Творческий дизайнер для создания интуитивных и красивых интерфейсов.",
    },
    JobPosting {
        id: 3,
        title: "Product Manager",
        department: "Продукт",
        location: "Санкт-Петербург",
        employment_type: "Полная занятость",
        description: "Опытный product manager для управления развитием наших продуктов.",
    },
    JobPosting {
        id: 4,
        title: "Data Analyst",
        department: "Аналитика",
        location: "Москва",
        employment_type: "Полная занятость",
        description: "Аналитик данных для работы с метриками и принятия решений на основе данных.",
    },
    JobPosting {
        id: 5,
        title: "Marketing Intern",
        department: "Маркетинг",
        location: "Москва",
        employment_type: "Стажировка",
        description: "Стажёр в отдел маркетинга для студентов, интересующихся digital-маркетингом.",
    },
    JobPosting {
        id: 6,
        title: "Backend Developer",
        department: "Разработка",
        location: "Удалённо",
        employment_type: "Полная занятость",
        description: "Backend-разработчик для создания масштабируемых серверных решений.",
    },
];

/// Distinct departments in first-seen order, led by [`ALL_DEPARTMENTS`].
pub fn list_departments(postings: &[JobPosting]) -> Vec<&'static str> {
    let mut departments = vec![ALL_DEPARTMENTS];
    for posting in postings {
        if !departments.contains(&posting.department) {
            departments.push(posting.department);
        }
    }
    departments
}

pub fn filter_by_department<'a>(postings: &'a [JobPosting], selected: &str) -> Vec<&'a JobPosting> {
    if selected == ALL_DEPARTMENTS {
        return postings.iter().collect();
    }
    postings
        .iter()
        .filter(|posting| posting.department == selected)
        .collect()
}

/// Careers page state: the catalog plus the department the visitor picked.
#[derive(Debug, Clone)]
pub struct JobBoard<'a> {
    postings: &'a [JobPosting],
    selected_department: String,
}

impl Default for JobBoard<'static> {
    fn default() -> Self {
        Self::new(&JOB_POSTINGS)
    }
}

impl<'a> JobBoard<'a> {
    pub fn new(postings: &'a [JobPosting]) -> Self {
        Self {
            postings,
            selected_department: ALL_DEPARTMENTS.to_string(),
        }
    }

    pub fn select_department(&mut self, department: impl Into<String>) {
        self.selected_department = department.into();
    }

    pub fn selected_department(&self) -> &str {
        &self.selected_department
    }

    pub fn departments(&self) -> Vec<&'static str> {
        list_departments(self.postings)
    }

    pub fn visible_postings(&self) -> Vec<&'a JobPosting> {
        filter_by_department(self.postings, &self.selected_department)
    }

    pub fn posting(&self, id: u32) -> Option<&'a JobPosting> {
        self.postings.iter().find(|posting| posting.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(id: u32, department: &'static str) -> JobPosting {
        JobPosting {
            id,
            title: "Role",
            department,
            location: "Москва",
            employment_type: "Полная занятость",
            description: "",
        }
    }

    #[test]
    fn seeded_catalog_lists_departments_in_first_seen_order() {
        assert_eq!(
            list_departments(&JOB_POSTINGS),
            vec!["Все", "Разработка", "Дизайн", "Продукт", "Аналитика", "Маркетинг"]
        );
    }

    #[test]
    fn departments_are_unique_regardless_of_ordering() {
        let postings = [
            posting(1, "Дизайн"),
            posting(2, "Дизайн"),
            posting(3, "Аналитика"),
            posting(4, "Дизайн"),
            posting(5, "Аналитика"),
        ];
        assert_eq!(
            list_departments(&postings),
            vec![ALL_DEPARTMENTS, "Дизайн", "Аналитика"]
        );
        assert_eq!(list_departments(&[]), vec![ALL_DEPARTMENTS]);
    }

    #[test]
    fn filter_keeps_only_matching_department_in_source_order() {
        let filtered = filter_by_department(&JOB_POSTINGS, "Разработка");
        let ids: Vec<u32> = filtered.iter().map(|posting| posting.id).collect();
        assert_eq!(ids, vec![1, 6]);
        assert!(filtered
            .iter()
            .all(|posting| posting.department == "Разработка"));
    }

    #[test]
    fn sentinel_returns_every_posting() {
        let filtered = filter_by_department(&JOB_POSTINGS, ALL_DEPARTMENTS);
        let ids: Vec<u32> = filtered.iter().map(|posting| posting.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn every_department_filter_matches_exactly() {
        for department in list_departments(&JOB_POSTINGS).into_iter().skip(1) {
            let expected: Vec<u32> = JOB_POSTINGS
                .iter()
                .filter(|posting| posting.department == department)
                .map(|posting| posting.id)
                .collect();
            let actual: Vec<u32> = filter_by_department(&JOB_POSTINGS, department)
                .iter()
                .map(|posting| posting.id)
                .collect();
            assert_eq!(actual, expected, "department {department}");
        }
    }

    #[test]
    fn unknown_department_yields_nothing() {
        assert!(filter_by_department(&JOB_POSTINGS, "Бухгалтерия").is_empty());
    }

    #[test]
    fn board_starts_unfiltered_and_follows_selection() {
        let mut board = JobBoard::default();
        assert_eq!(board.selected_department(), ALL_DEPARTMENTS);
        assert_eq!(board.visible_postings().len(), JOB_POSTINGS.len());

        board.select_department("Маркетинг");
        let visible = board.visible_postings();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Marketing Intern");

        board.select_department(ALL_DEPARTMENTS);
        assert_eq!(board.visible_postings().len(), JOB_POSTINGS.len());
        assert_eq!(board.posting(3).map(|p| p.title), Some("Product Manager"));
    }
}
