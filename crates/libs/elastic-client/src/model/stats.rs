use std::ops::AddAssign;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InsertStats {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub deleted: usize,
}

impl InsertStats {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped
    }
}

impl AddAssign<InsertStats> for InsertStats {
    fn add_assign(&mut self, rhs: InsertStats) {
        self.created += rhs.created;
        self.updated += rhs.updated;
        self.skipped += rhs.skipped;
        self.deleted += rhs.deleted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_accumulate() {
        let mut total = InsertStats::default();
        total += InsertStats {
            created: 2,
            updated: 1,
            skipped: 0,
            deleted: 0,
        };
        total += InsertStats {
            created: 3,
            updated: 0,
            skipped: 1,
            deleted: 0,
        };
        assert_eq!(total.created, 5);
        assert_eq!(total.total(), 7);
    }
}
