//! Product content: star placement, messages and widget pools.

use crate::stars::{Feature, Position, Star, StarId, StarMessage};
use chrono::{Datelike, NaiveDate};

/// Stars traced by the seasonal constellation, in drawing order.
pub const ARIES_PATH: [u32; 4] = [5, 6, 9, 13];

/// Milliseconds after the path appears at which each path star lights up.
pub const ARIES_OFFSETS_MS: [u64; 4] = [0, 2020, 3110, 3800];

fn plain(id: u32, x: f64, y: f64) -> Star {
    Star {
        id: StarId::new(id),
        position: Position::new(x, y),
        message: None,
    }
}

fn speaking(
    id: u32,
    x: f64,
    y: f64,
    label: &'static str,
    body: &'static str,
    feature: Feature,
) -> Star {
    Star {
        id: StarId::new(id),
        position: Position::new(x, y),
        message: Some(StarMessage {
            label,
            body,
            feature,
        }),
    }
}

pub fn stars() -> Vec<Star> {
    vec![
        plain(1, 12.0, 8.0),
        plain(2, 38.0, 10.0),
        plain(3, 62.0, 9.0),
        plain(4, 86.0, 11.0),
        speaking(
            5,
            20.0,
            16.0,
            "기쁠 때",
            "무슨 일이야! 좋은 일이지? 얼른 나한테 자랑해. 네가 거기서 웃으면 나도 여기서 행복해져. 오늘 그 기분 마음껏 즐겨!",
            Feature::Fireworks,
        ),
        speaking(
            6,
            48.0,
            14.0,
            "심심할 때",
            "심심할 땐 역시 가니 생각이지! 농담이고 바로 연락해. 시차 따윈 우리의 수다를 막을 수 없어. 아아 대기 중이다 오바!",
            Feature::Bored,
        ),
        speaking(
            7,
            74.0,
            17.0,
            "외로울 때",
            "낯선 곳이라 더 외롭지? 지구 반대편에 있어도 마음은 늘 네 옆에 있어. 고개 들고 하늘 봐, 우린 같은 하늘 아래 있잖아 (오글)",
            Feature::Hug,
        ),
        speaking(
            9,
            58.0,
            20.0,
            "그리울 때",
            "보고 싶다 황혜솔~ 우리 함께 아지트에서 나누던 수다들이 그립다. 한국 오면 바로 맛집 투어+수다 20020407시간이야. 조금만 더 힘내자!",
            Feature::Secret,
        ),
        speaking(
            11,
            10.0,
            28.0,
            "힘들 때",
            "거기서 적응하느라 얼마나 애쓰고 있는지 다 알아. 오늘만큼은 씩씩한 척 말고 그냥 투정 부려도 돼. 다 들어줄게. 고생했어 정말.",
            Feature::Breathing,
        ),
        speaking(
            12,
            34.0,
            30.0,
            "울적할 때",
            "기분이 축 처지는 날이네. 이럴 땐 맛있는 거 먹고 따뜻한 이불 속에 쏙 들어가. 내일은 분명 오늘보다 더 괜찮은 하루가 될 거야.",
            Feature::Scratch,
        ),
        speaking(
            13,
            60.0,
            27.0,
            "용기가 필요할 때",
            "겁나고 두려울 수 있어. 당연한 거야. 그래도 하나만 기억해줘. 넌 내가 아는 사람 중 제일 단단하고 멋있는 친구야. 망설이지 말고 질러!",
            Feature::CourageAudio,
        ),
        speaking(
            15,
            22.0,
            34.0,
            "칭찬 받고 싶을 때",
            "타지에서 혼자 밥 챙겨 먹고, 공부하고, 살아가는 것만으로도 넌 진짜 대단해. 오늘 하루도 무사히 보낸 너한테 박수~~!",
            Feature::Praise,
        ),
        speaking(
            16,
            46.0,
            36.0,
            "몸이 아플 때",
            "아픈 게 제일 서러운데 어떡해... 약은 먹었어? 입맛 없어도 밥 꼭 챙겨 먹고. 푹 쉬고 얼른 나아라♡",
            Feature::Diagnosis,
        ),
        speaking(
            17,
            70.0,
            33.0,
            "잠이 안 올 때",
            "생각이 너무 많아서 그래? 별에게 오늘 하루 있었던 일, 하고 싶은 말 다 전해봐. 네 이야기가 밤하늘을 더욱 빛나게 할 거야.",
            Feature::Letter,
        ),
        plain(8, 30.0, 22.0),
        plain(10, 82.0, 24.0),
        plain(14, 88.0, 29.0),
        plain(18, 5.0, 18.0),
        plain(19, 95.0, 21.0),
        plain(20, 6.0, 32.0),
        plain(21, 94.0, 34.0),
        plain(22, 15.0, 42.0),
        plain(23, 85.0, 40.0),
        plain(24, 55.0, 45.0),
        plain(25, 32.0, 50.0),
        plain(26, 78.0, 50.0),
        plain(27, 5.0, 47.0),
        plain(30, 90.0, 45.0),
        plain(32, 50.0, 38.0),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceQuestion {
    pub id: u32,
    pub left: &'static str,
    pub right: &'static str,
}

pub const BALANCE_QUESTIONS: &[BalanceQuestion] = &[
    BalanceQuestion { id: 1, left: "웃음 참아야 할 상황에서만 터짐", right: "웃어도 되는 상황에서만 웃음 안 나옴" },
    BalanceQuestion { id: 2, left: "평생 양말이 항상 한 짝씩만 사라짐", right: "양말은 멀쩡한데 신발에서 항상 삑삑 소리남" },
    BalanceQuestion { id: 3, left: "재채기할 때마다 이상한 소리 나옴 (랜덤)", right: "하품하면 눈물이 오열하듯이 나옴" },
    BalanceQuestion { id: 4, left: "사람들이 내 농담을 10초 후에 이해함", right: "바로 이해하는데 아무도 안 웃음" },
    BalanceQuestion { id: 5, left: "회의 때 한 말만 꼭 밈으로 돌아다님", right: "아무 말도 안 했는데 내 이름이 밈이 됨" },
    BalanceQuestion { id: 6, left: "잠꼬대가 항상 인생 명언", right: "말실수하면 항상 랩처럼 라임 맞음" },
    BalanceQuestion { id: 7, left: "연인이 나를 볼 때마다 자동으로 함박웃음(무음)", right: "내 이름만 불러도 얼굴 빨개짐" },
    BalanceQuestion { id: 8, left: "싸워도 먼저 사과하면서 ‘그래도 사랑해’ 덧붙임", right: "사과는 안 하는데 이불 같이 덮고 자자고 함" },
    BalanceQuestion { id: 9, left: "연인이 내 손잡을 때마다 괜히 힘줌", right: "걸을 때 항상 내 쪽으로 몸 기울어짐" },
    BalanceQuestion { id: 10, left: "연인이 나랑 헤어질 상상만 해도 울어버림", right: "연인이 ‘우리 나중에 어떻게 늙을지’ 매일 말함" },
    BalanceQuestion { id: 11, left: "연인이 나 부를 때 항상 별명 + 애칭 풀콤보", right: "연인이 나 부를 때 항상 풀네임 + 진지한 눈빛" },
    BalanceQuestion { id: 12, left: "교수님이 내 얼굴은 확실히 기억함 (이유는 모름)", right: "이름은 아시는데 얼굴을 모르심 (예시 들 때 항상 혜솔이는~ 이러심)" },
    BalanceQuestion { id: 13, left: "팀플에서 내가 말하면 다들 메모함 (매우 진지)", right: "내가 말만 하면 웃음 터짐 (내용은 안 중요)" },
    BalanceQuestion { id: 14, left: "인사할 때 포옹 타이밍 매번 어색", right: "작별 인사에서 혼자만 손 흔듦" },
    BalanceQuestion { id: 15, left: "파티에서 딱 한 번 춤췄는데 그 영상이 돌고 있음", right: "한 번도 안 춰서 ‘전설의 미스터리녀’로 불림" },
];

pub const TMI_LIST: &[&str] = &[
    "1. 가은이는 고딩 때 비공식 성우로 활동한 적이 있다. \n(정말 “비공식”임)",
    "2. 가은이가 먹을 수 있는 오이 요리는 피클과 오이짠지무침 뿐이다. \n(무려 2개나 있음ㄷㄷ)",
    "3. 가은이는 소문난 문구 덕후이다. \n(근데 이제 한 명만 알고 있는)",
    "4. 가은이는 구름 한 점 없는 푸른 하늘의 날씨를 좋아한다. \n(정말 구름 1도 없어야 한다)",
    "5. 가은이가 초딩 때 수학 교과서에 있는 정의를 한 글자도 틀리지 않고 말한 적이 있다. \n(근데 지금은 기억력 왜 이 모양)",
    "6. 가은이는 방송부를 하며 매주 화요일마다 반에 늦게 들어갔다. \n(종 친 후에 들어가 문을 열면 모든 친구들이 나를 돌아보는 삶, 이게 슈스지 뭐야. 아마 이때부터 약간 관종이 된 게 아닐까 싶다)",
    "7. 가은이는 비 오는 날에 우산 안 쓰고 다니는 걸 좋아한다. \n(하지만 미친 여자처럼 보일까봐 자제 중이다)",
    "8. 가은이는 이미 웨딩드레스와 웨딩홀을 확정 지어놨다. \n(물론 예약금 안 넣었다 아직은. 비커즈...유 노 왓 암 생?)",
    "9. 가은이는 패션 리더가 되고 싶어하며 실제로 크롭티 유행의 선두자다. \n(고딩 때는 친구들의 코디로 일한 적이 있다. 이 또한 “비공식”이다. 특히 사이즈 문의 필요하면 언제나 환영)",
    "10. 가은이는 지금 혜솔이가 보고 싶다.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchMessage {
    pub text: &'static str,
    pub sub: &'static str,
}

pub const SCRATCH_MESSAGES: &[ScratchMessage] = &[
    ScratchMessage { text: "오늘은 맛있는 디저트 먹기 🍰", sub: "달콤한 게 최고의 약이야!" },
    ScratchMessage { text: "좋아하는 음악 들으며 산책하기 🎵", sub: "날씨 좋으면 더 좋고!" },
    ScratchMessage { text: "오늘 하루는 그냥 쉬어도 돼 💤", sub: "충전의 시간도 필요해" },
    ScratchMessage { text: "친구한테 수다 떨기 📞", sub: "말하다 보면 기분이 풀릴 거야" },
    ScratchMessage { text: "좋아하는 영화/드라마 정주행 🎬", sub: "현실 도피도 가끔은 필요해" },
    ScratchMessage { text: "따뜻한 차 한 잔 마시기 ☕", sub: "여유를 가져봐" },
    ScratchMessage { text: "고양이 영상 보기 🐱", sub: "귀여운 게 힐링이지!" },
    ScratchMessage { text: "일찍 자고 푹 쉬기 😴", sub: "내일은 더 나아질 거야" },
];

pub const DIAGNOSIS_RESULTS: &[&str] = &[
    "'가은 결핍증'입니다. \n즉시 가은이에게 보이스톡을 거세요.",
    "음... 엄살은 아니군요. \n당장 이불 속으로 들어가서 맛있는 간식 먹으며 푹 쉬세요! 명령입니다.",
    "많이 피곤한가 봐요. 따뜻한 물 마시고 꿀잠 자기!",
    "마음이 서러워서 생긴 병이네요. \n가은쌤이 실시간으로 응원 기운 보내는 중...",
    "이건 약도 없어요. \n가은이랑 맛있는 거 먹어야 낫는 병입니다. 한국 올 날만 기다리기!",
];

pub const GUIDE_STEPS: &[&str] = &[
    "고요한 밤하늘을 가만히 올려다보세요.",
    "유난히 반짝이며 말을 거는 별을 찾아보세요.",
    "지금 내 마음에 닿는 별을 선택해 위로를 받아보세요.",
    "숨겨진 선물이 있다면 마음껏 즐겨주세요.",
];

pub const GUIDE_EXTRAS: &[(&str, &str)] = &[
    ("✨ 나만의 별자리", "별과 별 사이를 이어 그림을 그려보세요."),
    (
        "💌 별에게 편지 쓰기",
        "'잠이 안 올 때' 별을 찾아 편지를 띄워보세요. 나의 이야기가 별이 되어 떠오릅니다.",
    ),
    (
        "🌙 달의 비밀",
        "오른쪽 위 달을 누르면 처음으로 돌아가요. '잠이 안 올 때' 별에서는 띄운 별들을 수거할 수도 있어요.",
    ),
];

const GREETINGS: &[&str] = &[
    "유난히 반짝이는 별을 찾아보세요.\n당신을 위한 따뜻한 이야기가 기다리고 있습니다.",
    "오늘 밤에도 별들이 너를 기다리고 있어.\n가장 반짝이는 별을 눌러봐.",
    "같은 하늘 아래, 같은 별을 보고 있어.\n반짝이는 별에 말을 걸어봐.",
    "조용한 밤하늘에 작은 선물을 숨겨뒀어.\n반짝이는 별을 찾아봐.",
];

/// The intro line for a given day. Stable for the whole day.
pub fn daily_greeting(date: NaiveDate) -> &'static str {
    GREETINGS[date.ordinal0() as usize % GREETINGS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_greeting_is_stable_within_a_day() {
        let day = NaiveDate::from_ymd_opt(2025, 4, 3).unwrap();
        assert_eq!(daily_greeting(day), daily_greeting(day));
        let next = day.succ_opt().unwrap();
        assert_ne!(daily_greeting(day), daily_greeting(next));
    }

    #[test]
    fn test_aries_path_stars_exist_and_speak() {
        let stars = stars();
        for id in ARIES_PATH {
            let star = stars.iter().find(|s| u32::from(s.id) == id).unwrap();
            assert!(star.is_message_bearing());
        }
        assert_eq!(ARIES_PATH.len(), ARIES_OFFSETS_MS.len());
    }

    #[test]
    fn test_only_star_nine_keeps_a_secret() {
        let secret: Vec<u32> = stars()
            .iter()
            .filter(|s| s.feature() == Some(Feature::Secret))
            .map(|s| u32::from(s.id))
            .collect();
        assert_eq!(secret, vec![9]);
    }
}
