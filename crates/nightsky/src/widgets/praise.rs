use strum::{Display as StrumDisplay, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter)]
pub enum PraiseTopic {
    #[strum(serialize = "학업·일")]
    Study,
    #[strum(serialize = "인간관계")]
    Friends,
    #[strum(serialize = "갓생·생활")]
    Routine,
    #[strum(serialize = "용기·도전")]
    Courage,
    #[strum(serialize = "멘탈관리")]
    Composure,
    #[strum(serialize = "그냥")]
    JustBecause,
}

impl PraiseTopic {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Study => {
                "황혜솔 공부 잘하는 거 모르는 사람 있냐?\n일단 나는 잘하는 거 진작에 알고 있었다.\n\n거기서도 잘하는 건 반칙이세요🙏"
            }
            Self::Friends => {
                "파워 인싸가 되었다는 소식 들었다.\n역시 넌 E야.\n\n뭐? 남친도 생겼다고? 이 사람 봐라.\n우리한테 바로 얘기해줘야지. 얼른 카톡 ㄱ"
            }
            Self::Routine => {
                "공부도 하고 친구도 사귀고 파티도 하고\n여행도 다니며 우리랑 연락도 계속하고..\n\n너 이거 갓생이야. 너 갓생러야."
            }
            Self::Courage => {
                "넌 이미 혼자서 새로운 곳에 가서\n새로운 사람을 만나고 새로운 하루를 보내고 있잖아.\n\n이거 모두 용기가 없으면 할 수 없는 일인 거 알지?\n넌 용감하고 대단한 사람이야. 늘 기억해."
            }
            Self::Composure => {
                "이야 그 상황에서 화도 안 내고/울지도 않고/웃지도 않고/욕도 안 하고 어떻게 참았냐.(나였으면 이미 박살 내거나/울거나/욕먹거나 셋 중 하나다)\n\n넌 정말 성숙한 사람이야.\n너가 오늘 참고 넘어간 건 너가 부족해서가 아니야.\n\n걔가 이상한 거지. 웃기는 놈들이네.\n카톡으로 다 풀어!!!"
            }
            Self::JustBecause => "넌 최고야\n\n다 뿌셔버려",
        }
    }
}

/// Keyword buttons on the praise star; pressing the active one again clears it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PraisePicker {
    active: Option<PraiseTopic>,
}

impl PraisePicker {
    pub fn active(&self) -> Option<PraiseTopic> {
        self.active
    }

    pub fn toggle(&mut self, topic: PraiseTopic) {
        self.active = if self.active == Some(topic) {
            None
        } else {
            Some(topic)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_toggle_selects_and_clears() {
        let mut picker = PraisePicker::default();
        picker.toggle(PraiseTopic::Study);
        assert_eq!(picker.active(), Some(PraiseTopic::Study));
        picker.toggle(PraiseTopic::Friends);
        assert_eq!(picker.active(), Some(PraiseTopic::Friends));
        picker.toggle(PraiseTopic::Friends);
        assert_eq!(picker.active(), None);
    }

    #[test]
    fn test_every_topic_has_label_and_message() {
        assert_eq!(PraiseTopic::iter().count(), 6);
        for topic in PraiseTopic::iter() {
            assert!(!topic.to_string().is_empty());
            assert!(!topic.message().is_empty());
        }
        assert_eq!(PraiseTopic::JustBecause.to_string(), "그냥");
    }
}
